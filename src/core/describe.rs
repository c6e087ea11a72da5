/// Maximum length of a description taken from a free-text note.
const NOTE_TRUNCATE_LEN: usize = 48;

/// Resolve a human-readable description for an income row.
///
/// Ordered fallback chain; the first non-blank source wins:
/// 1. explicit title
/// 2. explicit venue/location
/// 3. truncated free-text note
/// 4. city-qualified generic label
/// 5. the literal "Income"
pub fn resolve_income_description(
    title: Option<&str>,
    venue: Option<&str>,
    note: Option<&str>,
    city: Option<&str>,
) -> String {
    if let Some(title) = non_blank(title) {
        return title.to_string();
    }
    if let Some(venue) = non_blank(venue) {
        return venue.to_string();
    }
    if let Some(note) = non_blank(note) {
        return truncate_note(note);
    }
    if let Some(city) = non_blank(city) {
        return format!("Income ({})", city);
    }
    "Income".to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn truncate_note(note: &str) -> String {
    if note.chars().count() <= NOTE_TRUNCATE_LEN {
        note.to_string()
    } else {
        let head: String = note.chars().take(NOTE_TRUNCATE_LEN).collect();
        format!("{}...", head.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_wins_over_everything() {
        let description = resolve_income_description(
            Some("Saturday wedding set"),
            Some("The Blue Room"),
            Some("long note"),
            Some("Austin"),
        );
        assert_eq!(description, "Saturday wedding set");
    }

    #[test]
    fn venue_when_title_blank() {
        let description =
            resolve_income_description(Some("   "), Some("The Blue Room"), None, None);
        assert_eq!(description, "The Blue Room");
    }

    #[test]
    fn note_truncated_to_limit() {
        let note = "Drove three airport runs and a late pickup downtown after the game let out";
        let description = resolve_income_description(None, None, Some(note), None);
        assert!(description.ends_with("..."));
        assert!(description.chars().count() <= NOTE_TRUNCATE_LEN + 3);
    }

    #[test]
    fn short_note_kept_verbatim() {
        let description = resolve_income_description(None, None, Some("Airport run"), None);
        assert_eq!(description, "Airport run");
    }

    #[test]
    fn city_qualified_label() {
        let description = resolve_income_description(None, None, None, Some("Austin"));
        assert_eq!(description, "Income (Austin)");
    }

    #[test]
    fn generic_literal_last() {
        assert_eq!(resolve_income_description(None, None, None, None), "Income");
        assert_eq!(
            resolve_income_description(Some(""), Some(" "), Some(""), Some("  ")),
            "Income"
        );
    }
}
