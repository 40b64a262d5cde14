use super::handlers::{health, user_login, user_register, users};
use utoipa::openapi::{
    Contact, InfoBuilder, License, OpenApiBuilder, Tag,
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};

pub const BEARER_SCHEME: &str = "bearer";

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = public_router().merge(protected_router()).split_for_parts();
    openapi
}

/// Routes anyone may call.
pub(crate) fn public_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(user_register::register))
        .routes(routes!(user_login::login));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Registration and password login".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Liveness and build information".to_string());

    let mut users_tag = Tag::new("users");
    users_tag.description = Some("Profiles, bearer token required".to_string());

    router.get_openapi_mut().tags = Some(vec![auth_tag, health_tag, users_tag]);

    router
}

/// Routes served behind the bearer gate.
pub(crate) fn protected_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::new().routes(routes!(users::get_user));

    router
        .get_openapi_mut()
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    OpenApiBuilder::new().info(info).build()
}

// Cargo authors look like "Name <email>".
fn cargo_contact() -> Option<Contact> {
    let author = env!("CARGO_PKG_AUTHORS").split(':').next().map(str::trim)?;

    let (name, email) = match author.split_once('<') {
        Some((name, email)) => (name.trim(), email.trim_end_matches('>').trim()),
        None => (author, ""),
    };
    if name.is_empty() && email.is_empty() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = optional_str(name).map(str::to_string);
    contact.email = optional_str(email).map(str::to_string);
    Some(contact)
}

fn optional_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));

        let contact = doc.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Tokengate"));
            assert_eq!(contact.email.as_deref(), Some("team@tokengate.dev"));
        }

        assert_eq!(
            doc.info.license.and_then(|license| license.identifier),
            Some("BSD-3-Clause".to_string())
        );
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = openapi();
        for path in ["/health", "/login", "/register", "/user/{username}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let schemes = doc
            .components
            .map(|components| components.security_schemes)
            .unwrap_or_default();
        assert!(schemes.contains_key(BEARER_SCHEME));
    }
}
