//! Built-in roadmap used when no usable persisted state exists.

use crate::model::roadmap::{Phase, Priority, Roadmap, Section, Task};
use crate::model::roadmap::Priority::{High as H, Low as L, Medium as M};

/// Supplies the roadmap a store falls back to.
///
/// Implemented for any `Fn() -> Roadmap`, so both `builtin_roadmap` and test
/// closures can be injected.
pub trait DefaultRoadmap {
    fn default_roadmap(&self) -> Roadmap;
}

impl<F> DefaultRoadmap for F
where
    F: Fn() -> Roadmap,
{
    fn default_roadmap(&self) -> Roadmap {
        self()
    }
}

struct PhaseSeed {
    title: &'static str,
    description: &'static str,
    duration: &'static str,
    sections: &'static [SectionSeed],
}

struct SectionSeed {
    title: &'static str,
    tasks: &'static [(&'static str, Priority)],
}

const BUILTIN_PHASES: &[PhaseSeed] = &[
    PhaseSeed {
        title: "Phase 1: Core Foundation",
        description: "Essential Java and Spring Boot fundamentals",
        duration: "4-6 weeks",
        sections: &[
            SectionSeed {
                title: "Java Language & OOP Fundamentals",
                tasks: &[
                    ("Syntax, control structures, exception handling", H),
                    ("Classes, objects, inheritance, polymorphism", H),
                    ("Interfaces, abstract classes, access modifiers", H),
                    ("Packages, static vs instance, Java memory model", M),
                    ("Java 8+ features: Lambdas, Streams, Optional", H),
                ],
            },
            SectionSeed {
                title: "DSA in Java",
                tasks: &[
                    ("Re-implement CP knowledge in Java", H),
                    ("Collections: List, Set, Map, Queue", H),
                    ("Generics, Comparable, Comparator", M),
                ],
            },
            SectionSeed {
                title: "Databases - Foundation",
                tasks: &[
                    ("PostgreSQL setup and basics", H),
                    ("SQL basics: SELECT, JOIN, GROUP BY", H),
                    ("Spring Data JPA + Hibernate", H),
                    ("Entity relationships (OneToMany, ManyToOne)", H),
                ],
            },
            SectionSeed {
                title: "RESTful API Design",
                tasks: &[
                    ("Design RESTful endpoints", H),
                    ("Spring Boot controllers and services", H),
                    ("DTOs and validation with annotations", H),
                    ("Exception handling with @ControllerAdvice", H),
                ],
            },
            SectionSeed {
                title: "Basic Security",
                tasks: &[
                    ("Spring Security basics", H),
                    ("JWT authentication", H),
                    ("Role-based access control", M),
                    ("Password encoding with BCrypt", H),
                ],
            },
            SectionSeed {
                title: "Testing Foundation",
                tasks: &[
                    ("Unit testing with JUnit 5", H),
                    ("Mocking with Mockito", H),
                    ("Integration testing with Spring Boot Test", M),
                    ("Test REST endpoints with MockMvc", M),
                ],
            },
        ],
    },
    PhaseSeed {
        title: "Phase 2: Production-Ready Backend",
        description: "Production-ready features and optimizations",
        duration: "3-4 weeks",
        sections: &[
            SectionSeed {
                title: "API Enhancement",
                tasks: &[
                    ("OpenAPI/Swagger documentation with SpringDoc", H),
                    ("API versioning strategies (/v1, /v2)", M),
                    ("Request/Response logging and monitoring", H),
                    ("Rate limiting with bucket4j", M),
                ],
            },
            SectionSeed {
                title: "Advanced Database",
                tasks: &[
                    ("Database design principles and normalization", H),
                    ("Query optimization and indexing", H),
                    ("Database migrations with Flyway", H),
                    ("Connection pooling (HikariCP)", M),
                    ("Database transactions and isolation levels", M),
                ],
            },
            SectionSeed {
                title: "Caching & Performance",
                tasks: &[
                    ("Redis for caching and sessions", H),
                    ("Spring Cache abstraction (@Cacheable)", H),
                    ("Application-level caching strategies", M),
                    ("Database query optimization", M),
                ],
            },
            SectionSeed {
                title: "Configuration & Logging",
                tasks: &[
                    ("Spring Profiles for different environments", H),
                    ("Externalized configuration (application.yml)", H),
                    ("Logging with SLF4J and Logback", H),
                    ("Structured logging for production", M),
                ],
            },
            SectionSeed {
                title: "Monitoring & Observability",
                tasks: &[
                    ("Spring Boot Actuator for health checks", H),
                    ("Custom metrics with Micrometer", M),
                    ("Application monitoring setup", M),
                ],
            },
        ],
    },
    PhaseSeed {
        title: "Phase 3: Mobile Backend Specifics",
        description: "Mobile-first backend features and patterns",
        duration: "2-3 weeks",
        sections: &[
            SectionSeed {
                title: "Mobile-First Features",
                tasks: &[
                    ("File upload/storage with AWS S3 or Cloudinary", H),
                    ("Image processing and optimization", M),
                    ("Push notifications with Firebase Cloud Messaging", H),
                    ("Real-time features with WebSockets", M),
                ],
            },
            SectionSeed {
                title: "Mobile API Patterns",
                tasks: &[
                    ("Pagination for large datasets", H),
                    ("Offline-first API design", M),
                    ("Data synchronization strategies", M),
                    ("Mobile-optimized response formats", M),
                ],
            },
            SectionSeed {
                title: "Advanced Security",
                tasks: &[
                    ("OAuth 2.0 / OpenID Connect", H),
                    ("API key management", M),
                    ("CORS configuration for web/mobile", H),
                    ("Input validation and sanitization", H),
                ],
            },
        ],
    },
    PhaseSeed {
        title: "Phase 4: DevOps & Deployment",
        description: "Deployment and DevOps practices",
        duration: "2-3 weeks",
        sections: &[
            SectionSeed {
                title: "Containerization",
                tasks: &[
                    ("Docker basics and concepts", H),
                    ("Create optimized Dockerfile for Spring Boot", H),
                    ("Docker Compose for local development", M),
                    ("Multi-stage builds for production", M),
                ],
            },
            SectionSeed {
                title: "CI/CD Pipeline",
                tasks: &[
                    ("GitHub Actions for automated testing", M),
                    ("Automated deployment pipeline", M),
                    ("Environment-specific configurations", M),
                ],
            },
            SectionSeed {
                title: "Cloud Deployment",
                tasks: &[
                    ("Deploy to Railway/Render/Heroku", H),
                    ("Database hosting (PostgreSQL on cloud)", H),
                    ("Environment variables and secrets management", H),
                    ("Basic AWS services (S3, RDS, EC2)", L),
                ],
            },
        ],
    },
    PhaseSeed {
        title: "Phase 5: Advanced Architecture (Optional)",
        description: "Advanced patterns and technologies",
        duration: "As needed",
        sections: &[
            SectionSeed {
                title: "Microservices Patterns",
                tasks: &[
                    ("Service decomposition strategies", L),
                    ("Inter-service communication", L),
                    ("API Gateway patterns", L),
                ],
            },
            SectionSeed {
                title: "Message Queues",
                tasks: &[
                    ("RabbitMQ for async processing", L),
                    ("Apache Kafka for event streaming", L),
                ],
            },
            SectionSeed {
                title: "Alternative Technologies",
                tasks: &[
                    ("GraphQL with Spring GraphQL", L),
                    ("NoSQL databases (MongoDB)", L),
                    ("Reactive programming with Spring WebFlux", L),
                ],
            },
        ],
    },
];

/// Builds the backend learning roadmap with every task unchecked.
///
/// Ids are freshly generated on each call.
pub fn builtin_roadmap() -> Roadmap {
    let phases = BUILTIN_PHASES
        .iter()
        .zip(1u32..)
        .map(|(seed, ordinal)| {
            seed.sections.iter().fold(
                Phase::new(ordinal, seed.title)
                    .with_description(seed.description)
                    .with_estimated_duration(seed.duration),
                |phase, section_seed| phase.with_section(build_section(section_seed)),
            )
        })
        .collect();
    Roadmap::new(phases)
}

fn build_section(seed: &SectionSeed) -> Section {
    seed.tasks
        .iter()
        .fold(Section::new(seed.title), |section, &(text, priority)| {
            section.with_task(Task::new(text, None).with_priority(priority))
        })
}
