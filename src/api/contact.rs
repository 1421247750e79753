//! Contact form endpoint.

use axum::{extract::rejection::JsonRejection, Json};

use crate::models::{ContactRequest, ContactResponse};

/// POST /api/contact
///
/// Always acknowledges. The submission is only written to the log.
pub async fn submit_contact(
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Json<ContactResponse> {
    match payload {
        Ok(Json(contact)) => tracing::info!(
            name = %contact.name,
            email = %contact.email,
            subject = %contact.subject,
            "Contact form submission: {}",
            contact.message
        ),
        Err(rejection) => tracing::warn!("Unreadable contact form submission: {}", rejection),
    }

    Json(ContactResponse {
        success: true,
        message: "Thank you for your message! We'll get back to you soon.".to_string(),
        redirect: "/thank-you".to_string(),
    })
}
