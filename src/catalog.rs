use crate::types::Supplement;

/// The fixed set of supplement categories shown on the landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Creatine,
    Protein,
    Omega3,
    VitaminD,
    PreWorkout,
    Bcaas,
    Nootropics,
    Vitamins,
}

impl Category {
    /// Carousel/grouping order.
    pub const ALL: [Category; 8] = [
        Category::Creatine,
        Category::Protein,
        Category::Omega3,
        Category::VitaminD,
        Category::PreWorkout,
        Category::Bcaas,
        Category::Nootropics,
        Category::Vitamins,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Creatine => "creatine",
            Category::Protein => "protein",
            Category::Omega3 => "omega3",
            Category::VitaminD => "vitamind",
            Category::PreWorkout => "preworkout",
            Category::Bcaas => "bcaas",
            Category::Nootropics => "nootropics",
            Category::Vitamins => "vitamins",
        }
    }

    pub fn display_name(&self) -> String {
        CATEGORY_LABELS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| default_label(self.key()))
    }
}

/// Fixed display labels; categories without an entry get `default_label`.
pub const CATEGORY_LABELS: &[(Category, &str)] = &[
    (Category::Creatine, "Creatine Supplements"),
    (Category::Protein, "Protein Supplements"),
    (Category::Omega3, "Omega-3 Supplements"),
    (Category::VitaminD, "Vitamin D Supplements"),
    (Category::Nootropics, "Nootropic Supplements"),
    (Category::PreWorkout, "Pre-Workout Supplements"),
    (Category::Vitamins, "Vitamin Supplements"),
    (Category::Bcaas, "BCAA Supplements"),
];

/// Capitalized category key + " Supplements".
pub fn default_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("{}{} Supplements", first.to_uppercase(), chars.as_str()),
        None => "Supplements".to_string(),
    }
}

/// Ordered category rules: the first rule whose keyword appears in the
/// lowercased name wins. Evaluation order is load-bearing here — a name
/// matching several rules resolves to the earliest one.
pub const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (
        &["protein", "whey", "casein", "isolate", "concentrate"],
        Category::Protein,
    ),
    (&["creatine"], Category::Creatine),
    (
        &["omega", "fish oil", "dha", "epa", "krill"],
        Category::Omega3,
    ),
    (
        &["vitamin d", "cholecalciferol", "d3"],
        Category::VitaminD,
    ),
    (
        &["caffeine", "citrulline", "beta-alanine", "pre-workout", "pre workout"],
        Category::PreWorkout,
    ),
    (
        &["bcaa", "amino", "leucine", "isoleucine", "valine"],
        Category::Bcaas,
    ),
    (
        &["alpha-gpc", "lion", "bacopa", "rhodiola", "phosphatidyl", "nootropic"],
        Category::Nootropics,
    ),
    (
        &["vitamin", "multi", "magnesium", "zinc", "iron", "calcium"],
        Category::Vitamins,
    ),
];

/// Derive a category from a supplement name. Names matching no rule
/// default to Vitamins.
pub fn category_for(name: &str) -> Category {
    let lower = name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Vitamins)
}

/// Name-specific icon rules, checked before the category default.
pub const ICON_RULES: &[(&str, &str)] = &[
    ("creatine", "💊"),
    ("whey", "🥛"),
    ("protein", "🥛"),
    ("fish oil", "🐟"),
    ("omega", "🐟"),
    ("vitamin d", "☀️"),
    ("caffeine", "☕"),
    ("bcaa", "⚡"),
    ("amino", "⚡"),
    ("multi", "🌈"),
    ("magnesium", "⚪"),
    ("vitamin c", "🍊"),
    ("alpha-gpc", "🧠"),
    ("nootropic", "🧠"),
    ("lion", "🍄"),
    ("citrulline", "💪"),
];

fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Creatine => "💊",
        Category::Protein => "🥛",
        Category::Omega3 => "🐟",
        Category::VitaminD => "☀️",
        Category::PreWorkout => "💪",
        Category::Bcaas => "⚡",
        Category::Nootropics => "🧠",
        Category::Vitamins => "🌿",
    }
}

/// Decorative icon for a supplement: specific name match first, then the
/// category default.
pub fn icon_for(name: &str, category: Category) -> &'static str {
    let lower = name.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or_else(|| category_icon(category))
}

/// Group supplements into ordered, non-empty category groups. Rebuilt on
/// every full load; record order within a group follows fetch order.
pub fn group_by_category(supplements: &[Supplement]) -> Vec<(Category, Vec<Supplement>)> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<Supplement> = supplements
                .iter()
                .filter(|s| category_for(&s.name) == category)
                .cloned()
                .collect();
            (!members.is_empty()).then_some((category, members))
        })
        .collect()
}

/// Suggestion list cap for the live search dropdown.
pub const SUGGESTION_CAP: usize = 8;

/// Case-insensitive substring filter over supplement names, capped at
/// `SUGGESTION_CAP` entries. An empty term yields no suggestions.
pub fn search_suggestions(supplements: &[Supplement], term: &str) -> Vec<Supplement> {
    let term = term.to_lowercase();
    let term = term.trim();
    if term.is_empty() {
        return vec![];
    }
    supplements
        .iter()
        .filter(|s| s.name.to_lowercase().contains(term))
        .take(SUGGESTION_CAP)
        .cloned()
        .collect()
}

/// Tracks with five or fewer entries get the "few-items" styling class.
pub fn track_class(item_count: usize) -> &'static str {
    if item_count <= 5 {
        "carousel-track few-items"
    } else {
        "carousel-track"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Supplement {
        Supplement {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn protein_keywords_resolve_to_protein() {
        for name in ["Whey Isolate", "Casein Protein", "Micellar CONCENTRATE", "whey"] {
            assert_eq!(category_for(name), Category::Protein, "{name}");
        }
    }

    #[test]
    fn unmatched_names_default_to_vitamins() {
        assert_eq!(category_for("Shilajit Resin"), Category::Vitamins);
        assert_eq!(category_for(""), Category::Vitamins);
    }

    #[test]
    fn rule_order_is_significant() {
        // Protein rules are evaluated before creatine rules, so a name
        // matching both resolves to protein.
        assert_eq!(category_for("Creatine Protein Stack"), Category::Protein);
        // And creatine before omega.
        assert_eq!(category_for("Creatine + Fish Oil"), Category::Creatine);
    }

    #[test]
    fn category_coverage() {
        assert_eq!(category_for("Creatine Monohydrate"), Category::Creatine);
        assert_eq!(category_for("Krill Oil"), Category::Omega3);
        assert_eq!(category_for("Vitamin D3"), Category::VitaminD);
        assert_eq!(category_for("Caffeine Anhydrous"), Category::PreWorkout);
        assert_eq!(category_for("BCAA 2:1:1"), Category::Bcaas);
        assert_eq!(category_for("Bacopa Monnieri"), Category::Nootropics);
        assert_eq!(category_for("Magnesium Glycinate"), Category::Vitamins);
    }

    #[test]
    fn display_names_and_default_label() {
        assert_eq!(Category::Omega3.display_name(), "Omega-3 Supplements");
        assert_eq!(Category::Bcaas.display_name(), "BCAA Supplements");
        assert_eq!(default_label("creatine"), "Creatine Supplements");
        assert_eq!(default_label(""), "Supplements");
    }

    #[test]
    fn icons_prefer_specific_name_matches() {
        assert_eq!(icon_for("Creatine Monohydrate", Category::Creatine), "💊");
        // "vitamin c" rule beats the vitamins category default.
        assert_eq!(icon_for("Vitamin C 1000mg", Category::Vitamins), "🍊");
        // No name rule matches: category default applies.
        assert_eq!(icon_for("Zinc Picolinate", Category::Vitamins), "🌿");
        assert_eq!(icon_for("Beta-Alanine", Category::PreWorkout), "💪");
    }

    #[test]
    fn grouping_keeps_order_and_drops_empty_categories() {
        let supplements = vec![
            named("Vitamin D3"),
            named("Creatine Monohydrate"),
            named("Whey Isolate"),
            named("Creatine HCL"),
        ];
        let groups = group_by_category(&supplements);
        let keys: Vec<&str> = groups.iter().map(|(c, _)| c.key()).collect();
        assert_eq!(keys, vec!["creatine", "protein", "vitamind"]);

        let (_, creatines) = &groups[0];
        assert_eq!(creatines.len(), 2);
        assert_eq!(creatines[0].name, "Creatine Monohydrate");
    }

    #[test]
    fn search_is_case_insensitive_and_capped() {
        let mut supplements: Vec<Supplement> =
            (0..12).map(|i| named(&format!("Creatine Blend {i}"))).collect();
        supplements.push(named("Whey Protein"));

        let hits = search_suggestions(&supplements, "CREATINE");
        assert_eq!(hits.len(), SUGGESTION_CAP);

        let hits = search_suggestions(&supplements, "whey");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Whey Protein");

        assert!(search_suggestions(&supplements, "   ").is_empty());
    }

    #[test]
    fn few_items_styling_threshold() {
        assert_eq!(track_class(5), "carousel-track few-items");
        assert_eq!(track_class(6), "carousel-track");
    }
}
