//! Template registry with deterministic selection.

use std::collections::HashMap;

use super::template::AutoJournalTemplate;

/// Ordered registry of active templates keyed by trigger event.
///
/// Candidates are ordered once at construction: priority descending,
/// then id ascending so ties break the same way on every run.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    by_trigger: HashMap<String, Vec<AutoJournalTemplate>>,
}

impl TemplateRegistry {
    /// Builds a registry from a template list, dropping inactive
    /// templates.
    #[must_use]
    pub fn new(templates: Vec<AutoJournalTemplate>) -> Self {
        let mut by_trigger: HashMap<String, Vec<AutoJournalTemplate>> = HashMap::new();
        for template in templates.into_iter().filter(|t| t.is_active) {
            by_trigger
                .entry(template.trigger_event.clone())
                .or_default()
                .push(template);
        }
        for candidates in by_trigger.values_mut() {
            candidates.sort_by_key(|t| (std::cmp::Reverse(t.priority), t.id.into_inner()));
        }
        Self { by_trigger }
    }

    /// Selects the winning template for a trigger, if any.
    #[must_use]
    pub fn select(&self, trigger: &str) -> Option<&AutoJournalTemplate> {
        self.by_trigger.get(trigger).and_then(|c| c.first())
    }

    /// Returns all candidates for a trigger in selection order.
    #[must_use]
    pub fn candidates(&self, trigger: &str) -> &[AutoJournalTemplate] {
        self.by_trigger.get(trigger).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of distinct triggers registered.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.by_trigger.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mizan_shared::types::TemplateId;

    fn make_template(trigger: &str, priority: i16, is_active: bool) -> AutoJournalTemplate {
        AutoJournalTemplate {
            id: TemplateId::new(),
            trigger_event: trigger.to_string(),
            name: format!("{trigger} p{priority}"),
            debit_lines: vec![],
            credit_lines: vec![],
            priority,
            is_active,
        }
    }

    #[test]
    fn test_highest_priority_wins() {
        let low = make_template("rental_receipt", 1, true);
        let high = make_template("rental_receipt", 10, true);
        let registry = TemplateRegistry::new(vec![low, high.clone()]);

        let selected = registry.select("rental_receipt").unwrap();
        assert_eq!(selected.id, high.id);
    }

    #[test]
    fn test_inactive_templates_excluded() {
        let inactive = make_template("loan_disbursed", 10, false);
        let active = make_template("loan_disbursed", 1, true);
        let registry = TemplateRegistry::new(vec![inactive, active.clone()]);

        let selected = registry.select("loan_disbursed").unwrap();
        assert_eq!(selected.id, active.id);
    }

    #[test]
    fn test_unknown_trigger_selects_nothing() {
        let registry = TemplateRegistry::new(vec![make_template("rental_receipt", 1, true)]);
        assert!(registry.select("unknown_event").is_none());
        assert!(registry.candidates("unknown_event").is_empty());
    }

    #[test]
    fn test_equal_priority_ties_break_by_id() {
        let a = make_template("payment_received", 5, true);
        let b = make_template("payment_received", 5, true);
        let expected = if a.id.into_inner() < b.id.into_inner() {
            a.id
        } else {
            b.id
        };

        let registry = TemplateRegistry::new(vec![a.clone(), b.clone()]);
        assert_eq!(registry.select("payment_received").unwrap().id, expected);

        // Same winner regardless of insertion order.
        let registry = TemplateRegistry::new(vec![b, a]);
        assert_eq!(registry.select("payment_received").unwrap().id, expected);
    }

    #[test]
    fn test_candidates_in_selection_order() {
        let low = make_template("rental_receipt", 1, true);
        let high = make_template("rental_receipt", 10, true);
        let registry = TemplateRegistry::new(vec![low.clone(), high.clone()]);

        let candidates = registry.candidates("rental_receipt");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, high.id);
        assert_eq!(candidates[1].id, low.id);
    }
}
