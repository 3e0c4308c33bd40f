pub mod password;

pub mod id_worker;
pub use id_worker::IdWorker;

pub mod artifact_service;
pub mod artifact_service_impl;
pub use artifact_service::{ArtifactCriteria, ArtifactError, ArtifactInput, ArtifactService};
pub use artifact_service_impl::SeaOrmArtifactService;

pub mod wizard_service;
pub mod wizard_service_impl;
pub use wizard_service::{WizardError, WizardRecord, WizardService};
pub use wizard_service_impl::SeaOrmWizardService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{NewUser, UserError, UserService, UserUpdate, has_admin_role};
pub use user_service_impl::SeaOrmUserService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginOutcome, TokenClaims};
pub use auth_service_impl::JwtAuthService;
