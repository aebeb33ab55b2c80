use super::AppError;

pub const MAX_TITLE_LEN: usize = 60;
pub const MAX_YEAR_LEN: usize = 4;
pub const MAX_NAME_LEN: usize = 20;

/// The only message users ever see for a rejected form.
pub const INVALID_INPUT: &str = "Invalid input.";

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Year is free text; "199x" or "TBA" pass as long as they fit.
pub fn validate_movie(title: &str, year: &str) -> Result<(), AppError> {
    if title.is_empty() {
        return Err(AppError::validation("Movie title cannot be empty"));
    }

    if char_len(title) > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Movie title must be {MAX_TITLE_LEN} characters or less"
        )));
    }

    if year.is_empty() {
        return Err(AppError::validation("Movie year cannot be empty"));
    }

    if char_len(year) > MAX_YEAR_LEN {
        return Err(AppError::validation(format!(
            "Movie year must be {MAX_YEAR_LEN} characters or less"
        )));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> Result<&str, AppError> {
    if name.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }

    if char_len(name) > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be {MAX_NAME_LEN} characters or less"
        )));
    }

    Ok(name)
}

pub fn validate_login(username: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_movie() {
        assert!(validate_movie("Test Movie Title", "2019").is_ok());
        assert!(validate_movie("a", "1").is_ok());
        assert!(validate_movie(&"t".repeat(60), "2019").is_ok());
        assert!(validate_movie("Leon", "199x").is_ok());

        assert!(validate_movie("", "2019").is_err());
        assert!(validate_movie("New Movie", "").is_err());
        assert!(validate_movie(&"t".repeat(61), "2019").is_err());
        assert!(validate_movie("New Movie", "20190").is_err());
    }

    #[test]
    fn test_validate_movie_counts_characters() {
        // 60 CJK characters are 180 bytes but still within bounds
        assert!(validate_movie(&"霸".repeat(60), "1993").is_ok());
        assert!(validate_movie(&"霸".repeat(61), "1993").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Test").is_ok());
        assert!(validate_name(&"n".repeat(20)).is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("test", "123").is_ok());
        assert!(validate_login("", "123").is_err());
        assert!(validate_login("test", "").is_err());
        assert!(validate_login("", "").is_err());
    }
}
