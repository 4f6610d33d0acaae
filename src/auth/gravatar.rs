const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// Avatar URL for an email: 200px, pg rating, mystery-man fallback.
pub fn avatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = md5::compute(normalized.as_bytes());
    format!("{}/{}?s=200&r=pg&d=mm", GRAVATAR_BASE, hex::encode(digest.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_email_hash() {
        // md5("myemailaddress@example.com")
        assert_eq!(
            avatar_url("MyEmailAddress@example.com "),
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?s=200&r=pg&d=mm"
        );
    }

    #[test]
    fn case_and_whitespace_do_not_matter() {
        assert_eq!(avatar_url(" A@B.io"), avatar_url("a@b.io"));
    }
}
