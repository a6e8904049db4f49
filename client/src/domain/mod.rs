//! Domain records, workflows and the session state machine.
//!
//! Purpose: hold every rule of the client core behind ports so adapters
//! stay thin. Records convert to and from document field maps; workflows
//! translate store failures into user-facing errors.
//!
//! Public surface:
//! - [`DocumentAccess`]: CRUD, queries and polling subscriptions.
//! - [`User`], [`PublicUser`], [`JobPosting`], [`Category`], [`Item`].
//! - [`AuthService`], [`ProfileService`], [`JobBoard`].
//! - [`SessionManager`] with the pure [`reduce`] function.

pub mod ports;

mod auth;
mod auth_service;
mod catalogue;
mod documents;
mod error;
mod fields;
mod job_board;
mod job_posting;
mod profile;
mod session;
mod session_manager;
mod user;
mod validation;

pub use self::auth::{
    AuthError, EMAIL_TAKEN_MESSAGE, INVALID_CREDENTIALS_MESSAGE, LoginCredentials,
    RegistrationRequest, normalise_email,
};
pub use self::auth_service::AuthService;
pub use self::catalogue::{Category, ITEM_STATUS_AVAILABLE, Item, ItemFilter};
pub use self::documents::{
    CREATED_AT, DEFAULT_POLL_INTERVAL, DocumentAccess, Subscription, UPDATED_AT,
};
pub use self::error::{DomainError, ErrorCode};
pub use self::job_board::{JobBoard, JobBoardError, JobSearch};
pub use self::job_posting::{
    JobPosting, JobPostingId, RECENT_POSTING_DAYS, StoredWorkSetup, WorkSetup,
};
pub use self::profile::{
    MAX_PROFILE_AGE, MIN_PROFILE_AGE, ProfileError, ProfileService, ProfileUpdate,
};
pub use self::session::{
    RestoredSession, RouteGate, SessionEvent, SessionPhase, SessionState, SessionToken, reduce,
};
pub use self::session_manager::SessionManager;
pub use self::user::{
    ANONYMOUS_DISPLAY_NAME, AddressDetails, Gender, PasswordHash, ProfileDetails, PublicUser,
    UnknownRole, User, UserId, UserRole, age_on,
};
pub use self::validation::ValidationReport;
