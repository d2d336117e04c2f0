//! Spyglass Modules - built-in lookup modules.
//!
//! Each module implements [`spyglass_plugin::LookupModule`] for one
//! service or local capability. [`builtins`] is the static registration
//! list consumed by `ModuleRegistry::discover`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod gravatar;
pub mod hibp;
pub mod ipinfo;
pub mod nominatim;
pub mod phone;
pub mod platforms;
pub mod pwned_passwords;
pub mod wigle;

pub use gravatar::GravatarModule;
pub use hibp::HibpModule;
pub use ipinfo::IpinfoModule;
pub use nominatim::NominatimModule;
pub use phone::PhoneModule;
pub use platforms::PlatformsModule;
pub use pwned_passwords::PwnedPasswordsModule;
pub use wigle::WigleModule;

use spyglass_plugin::LookupModule;
use std::sync::Arc;

/// The static registration list of all built-in modules.
#[must_use]
pub fn builtins() -> Vec<Arc<dyn LookupModule>> {
    vec![
        Arc::new(IpinfoModule::new()),
        Arc::new(GravatarModule::new()),
        Arc::new(HibpModule::new()),
        Arc::new(PwnedPasswordsModule::new()),
        Arc::new(WigleModule::new()),
        Arc::new(PlatformsModule::new()),
        Arc::new(NominatimModule::new()),
        Arc::new(PhoneModule::new()),
    ]
}
