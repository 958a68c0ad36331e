/// Account mail templates
///
/// Links point at the frontend, which calls back into the API with the token.
/// The plain-text body ends with the link.

use super::Email;
use crate::models::user::User;

/// Sender-independent product name used in subjects
pub const PRODUCT_NAME: &str = "TaskHub";

/// Confirmation mail sent after registration
pub fn confirmation_email(frontend_url: &str, user: &User, token: &str) -> Email {
    let link = format!("{}/confirm/{}", frontend_url.trim_end_matches('/'), token);

    Email {
        to: user.email.clone(),
        subject: format!("Confirm your {} account", PRODUCT_NAME),
        text: format!(
            "Hi {}, please confirm your {} account by opening this link: {}",
            user.name, PRODUCT_NAME, link
        ),
        html: format!(
            "<p>Hi {name}, please confirm your account.</p>\
             <p>Follow the link below to confirm it:</p>\
             <a href=\"{link}\">Confirm account</a>\
             <p>If you did not create this account, you can ignore this message.</p>",
            name = html_escape(&user.name),
            link = link,
        ),
    }
}

/// Password-reset mail
pub fn password_reset_email(frontend_url: &str, user: &User, token: &str) -> Email {
    let link = format!(
        "{}/forgot-password/{}",
        frontend_url.trim_end_matches('/'),
        token
    );

    Email {
        to: user.email.clone(),
        subject: format!("Reset your {} password", PRODUCT_NAME),
        text: format!(
            "Hi {}, a password reset was requested for your account. Open this link to choose a new password: {}",
            user.name, link
        ),
        html: format!(
            "<p>Hi {name}, a password reset was requested for your account.</p>\
             <p>Follow the link below to choose a new password:</p>\
             <a href=\"{link}\">Reset password</a>\
             <p>If you did not request this, you can ignore this message.</p>",
            name = html_escape(&user.name),
            link = link,
        ),
    }
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            confirmed: false,
            token_hash: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_confirmation_link() {
        let email = confirmation_email("http://localhost:5173/", &user("Ana"), "abc123");

        assert_eq!(email.to, "ana@example.com");
        assert!(email.text.ends_with("http://localhost:5173/confirm/abc123"));
        assert!(email.html.contains("href=\"http://localhost:5173/confirm/abc123\""));
    }

    #[test]
    fn test_reset_link() {
        let email = password_reset_email("https://app.example.com", &user("Ana"), "xyz");

        assert!(email.text.ends_with("https://app.example.com/forgot-password/xyz"));
        assert!(email.subject.contains("password"));
    }

    #[test]
    fn test_name_is_escaped_in_html() {
        let email = confirmation_email("http://x", &user("<b>Eve</b>"), "t");

        assert!(email.html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(!email.html.contains("<b>Eve"));
    }
}
