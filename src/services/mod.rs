// Service exports
pub mod file_store;
pub mod mailer;
pub mod rate_limit;
pub mod store;
pub mod supabase;

pub use file_store::FileStore;
pub use mailer::{MailRelay, MailerError, SmtpMailer};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use store::{ReviewStore, StoreError};
pub use supabase::SupabaseClient;
