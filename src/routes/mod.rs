/// Router Module Index
///
/// Organizes the application's routing logic into access-tier modules. Unlike a
/// hard authentication gate, the identity resolver never rejects a request — it
/// degrades to anonymous — so the tier split documents intent while the actual
/// privilege checks live in the service layer, where they are testable.
///
/// The three modules map directly to the defined access roles.

/// Routes accessible to all users (registration, login, moderated reads).
/// Read handlers must enforce visibility (`is_moderated = true`) via the filter.
pub mod public;

/// Routes that require a resolved authenticated identity. The service returns
/// `AuthenticationRequired` (401) when the caller is anonymous.
pub mod authenticated;

/// Routes restricted to users with the admin flag. The service enforces the
/// authentication and role checks in a fixed order.
pub mod admin;
