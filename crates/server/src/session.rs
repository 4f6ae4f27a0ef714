//! Session API endpoint

use api_types::session::{OrganizationView, ThemeView};
use axum::{Extension, Json};
use engine::Session;

/// Profile and brand colours of the authenticated organization.
pub async fn get(Extension(session): Extension<Session>) -> Json<OrganizationView> {
    let theme = session.theme().clone();
    let org = session.organization;

    Json(OrganizationView {
        id: org.id,
        name: org.name,
        email: org.email,
        ein: org.ein,
        country: org.country,
        state: org.state,
        description: org.description,
        theme: ThemeView {
            primary: theme.primary,
            secondary: theme.secondary,
            tertiary: theme.tertiary,
        },
    })
}
