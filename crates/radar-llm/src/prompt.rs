//! The shared perception prompt.
//!
//! Both providers receive the identical prompt; the exact-keys instruction at
//! the end is what makes the replies mergeable, so the wording is fixed.

/// Build the brand-perception prompt for one analysis.
///
/// The competitors clause is only present when the list is non-empty.
#[must_use]
pub fn build_perception_prompt(brand_name: &str, competitors: &[String]) -> String {
    let competitor_clause = if competitors.is_empty() {
        String::new()
    } else {
        format!(" compared to competitors: {}", competitors.join(", "))
    };

    format!(
        "Analyze the brand perception of \"{brand_name}\"{competitor_clause}.\n\
         \n\
         Provide a detailed analysis including:\n\
         1. Overall sentiment score (-1 to 1)\n\
         2. Key brand attributes (top 5)\n\
         3. Competitive positioning\n\
         4. Innovation score (0-10)\n\
         5. Trust score (0-10)\n\
         6. Sustainability score (0-10)\n\
         7. Value perception score (0-10)\n\
         \n\
         Format as JSON with these exact keys: sentiment, attributes, positioning, \
         innovation_score, trust_score, sustainability_score, value_score"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_brand() {
        let prompt = build_perception_prompt("Acme", &[]);
        assert!(prompt.starts_with("Analyze the brand perception of \"Acme\"."));
    }

    #[test]
    fn prompt_without_competitors_has_no_comparison_clause() {
        let prompt = build_perception_prompt("Acme", &[]);
        assert!(!prompt.contains("compared to competitors"));
    }

    #[test]
    fn prompt_lists_competitors_comma_separated() {
        let competitors = vec!["Globex".to_string(), "Initech".to_string()];
        let prompt = build_perception_prompt("Acme", &competitors);
        assert!(prompt.contains("\"Acme\" compared to competitors: Globex, Initech."));
    }

    #[test]
    fn prompt_demands_the_exact_judgement_keys() {
        let prompt = build_perception_prompt("Acme", &[]);
        assert!(prompt.contains(
            "Format as JSON with these exact keys: sentiment, attributes, positioning, \
             innovation_score, trust_score, sustainability_score, value_score"
        ));
    }
}
