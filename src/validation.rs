use crate::forms::{CommentForm, ListingForm, RegisterForm};
use crate::money::{Money, ParseMoneyError};
use thiserror::Error;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_COMMENT_LEN: usize = 2000;
pub const MAX_IMAGE_URL_LEN: usize = 500;
pub const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid amount for {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        source: ParseMoneyError,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Image URL must start with http:// or https://")]
    InvalidImageUrl,

    #[error("Passwords must match.")]
    PasswordMismatch,

    #[error("Username may only contain letters, digits and @/./+/-/_ characters.")]
    InvalidUsername,
}

/// Registration input after validation. The password is still plain text and
/// gets hashed by the account commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Listing input after validation, before the category is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub image_url: Option<String>,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(value)
}

fn bounded<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, ValidationError> {
    let value = required(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = bounded("Username", username, MAX_USERNAME_LEN)?;
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(username.to_string())
}

pub fn validate_registration(form: &RegisterForm) -> Result<Registration, ValidationError> {
    let username = validate_username(&form.username)?;
    if form.password.is_empty() {
        return Err(ValidationError::Empty("Password"));
    }
    if form.password != form.confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    // optional, but bounded by the column
    let email = match form.email.trim() {
        "" => String::new(),
        email => bounded("Email", email, MAX_EMAIL_LEN)?.to_string(),
    };
    Ok(Registration {
        username,
        email,
        password: form.password.clone(),
    })
}

pub fn validate_amount(field: &'static str, raw: &str) -> Result<Money, ValidationError> {
    raw.parse()
        .map_err(|source| ValidationError::InvalidAmount { field, source })
}

pub fn validate_listing(form: &ListingForm) -> Result<ListingDraft, ValidationError> {
    let category = required("Category", &form.category)?;
    let category_id = category
        .parse::<i64>()
        .map_err(|_| ValidationError::UnknownCategory(category.to_string()))?;

    let title = bounded("Title", &form.title, MAX_TITLE_LEN)?.to_string();
    let description = required("Description", &form.description)?.to_string();
    let starting_bid = validate_amount("Starting bid", &form.starting_bid)?;

    let image_url = match form.image_url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(url) => {
            let url = bounded("Image URL", url, MAX_IMAGE_URL_LEN)?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::InvalidImageUrl);
            }
            Some(url.to_string())
        }
    };

    Ok(ListingDraft {
        category_id,
        title,
        description,
        starting_bid,
        image_url,
    })
}

pub fn validate_comment(form: &CommentForm) -> Result<String, ValidationError> {
    Ok(bounded("Comment", &form.comment, MAX_COMMENT_LEN)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_form() -> ListingForm {
        ListingForm {
            category: "1".into(),
            title: "Vintage camera".into(),
            description: "Works fine".into(),
            starting_bid: "10.00".into(),
            image_url: None,
        }
    }

    #[test]
    fn accepts_valid_listing() {
        let draft = validate_listing(&listing_form()).unwrap();
        assert_eq!(draft.category_id, 1);
        assert_eq!(draft.starting_bid, Money::from_cents(1000));
        assert_eq!(draft.image_url, None);
    }

    #[test]
    fn zero_starting_bid_is_allowed() {
        let form = ListingForm {
            starting_bid: "0".into(),
            ..listing_form()
        };
        assert_eq!(validate_listing(&form).unwrap().starting_bid, Money::ZERO);
    }

    #[test]
    fn rejects_negative_starting_bid() {
        let form = ListingForm {
            starting_bid: "-5".into(),
            ..listing_form()
        };
        assert!(matches!(
            validate_listing(&form),
            Err(ValidationError::InvalidAmount { field: "Starting bid", .. })
        ));
    }

    #[test]
    fn rejects_blank_and_long_titles() {
        let blank = ListingForm {
            title: "   ".into(),
            ..listing_form()
        };
        assert_eq!(validate_listing(&blank), Err(ValidationError::Empty("Title")));

        let long = ListingForm {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..listing_form()
        };
        assert_eq!(
            validate_listing(&long),
            Err(ValidationError::TooLong {
                field: "Title",
                max: MAX_TITLE_LEN
            })
        );
    }

    #[test]
    fn image_url_must_be_http() {
        let form = ListingForm {
            image_url: Some("ftp://example.com/a.png".into()),
            ..listing_form()
        };
        assert_eq!(validate_listing(&form), Err(ValidationError::InvalidImageUrl));

        let form = ListingForm {
            image_url: Some("https://example.com/a.png".into()),
            ..listing_form()
        };
        assert_eq!(
            validate_listing(&form).unwrap().image_url.as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn non_numeric_category_is_unknown() {
        let form = ListingForm {
            category: "toys".into(),
            ..listing_form()
        };
        assert_eq!(
            validate_listing(&form),
            Err(ValidationError::UnknownCategory("toys".into()))
        );
    }

    #[test]
    fn registration_requires_matching_passwords() {
        let form = RegisterForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret".into(),
            confirmation: "secret!".into(),
        };
        assert_eq!(
            validate_registration(&form),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn email_is_optional_but_bounded() {
        let form = |email: String| RegisterForm {
            username: "alice".into(),
            email,
            password: "secret".into(),
            confirmation: "secret".into(),
        };
        assert_eq!(validate_registration(&form("  ".into())).unwrap().email, "");
        assert_eq!(
            validate_registration(&form(format!("{}@x.io", "a".repeat(200))))
                .unwrap()
                .email
                .len(),
            205
        );
        assert_eq!(
            validate_registration(&form(format!("{}@example.com", "a".repeat(250)))),
            Err(ValidationError::TooLong {
                field: "Email",
                max: MAX_EMAIL_LEN
            })
        );
    }

    #[test]
    fn username_charset() {
        assert_eq!(validate_username(" bob.smith+1 ").unwrap(), "bob.smith+1");
        assert_eq!(
            validate_username("bob smith"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(validate_username(""), Err(ValidationError::Empty("Username")));
    }

    #[test]
    fn comment_is_trimmed() {
        let form = CommentForm {
            listing_id: 1,
            comment: "  nice item  ".into(),
        };
        assert_eq!(validate_comment(&form).unwrap(), "nice item");
    }
}
