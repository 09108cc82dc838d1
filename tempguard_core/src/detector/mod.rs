//! Disposable email and phone detectors
//!
//! Both detectors are thin match engines over a `ListCache`:
//! - `EmailDetector`: domain-chain walk against the list and safe patterns
//! - `PhoneDetector`: exact canonical-form match against the list

pub mod email;
pub mod phone;

pub use email::{DomainEntries, EmailDetector, EmailVerdict};
pub use phone::{PhoneDetector, PhoneEntries, PhoneVerdict};
