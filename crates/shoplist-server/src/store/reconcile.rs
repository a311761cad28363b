//! List reconciliation.
//!
//! The client submits its full desired list; the plan computed here is the
//! minimal set of deletes and upserts that converges server state to it.
//! Identity is the item id: ids present on the server but absent from the
//! client get deleted, everything the client sent gets upserted
//! (last-write-wins, no field-level merging).

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Item, ItemInput, DEFAULT_PRICE};

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    /// Server ids the client no longer has.
    pub to_delete: Vec<String>,
    /// Every surviving client item. Each one carries an id: submitted ids
    /// are kept, new items get a fresh UUID here so the plan can be applied
    /// as a single batch of keyed statements.
    pub to_upsert: Vec<Item>,
}

pub fn reconcile(client: &[ItemInput], server: &[Item]) -> ReconcilePlan {
    let client_ids: HashSet<&str> = client.iter().filter_map(|i| i.id.as_deref()).collect();

    let to_delete = server
        .iter()
        .filter_map(|i| i.id.as_deref())
        .filter(|id| !client_ids.contains(id))
        .map(str::to_string)
        .collect();

    // Entries without a usable name are dropped rather than rejected.
    let to_upsert = client.iter().filter_map(plan_item).collect();

    ReconcilePlan { to_delete, to_upsert }
}

fn plan_item(input: &ItemInput) -> Option<Item> {
    let name = input.name.as_deref()?;
    if name.trim().is_empty() {
        return None;
    }

    Some(Item {
        id: Some(
            input
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        ),
        name: name.to_string(),
        price_a: input.price_a.clone().unwrap_or_else(|| DEFAULT_PRICE.to_string()),
        price_b: input.price_b.clone().unwrap_or_else(|| DEFAULT_PRICE.to_string()),
        purchased: input.purchased,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: Option<&str>, name: Option<&str>) -> ItemInput {
        ItemInput {
            id: id.map(String::from),
            name: name.map(String::from),
            price_a: None,
            price_b: None,
            purchased: false,
        }
    }

    fn stored(id: &str, name: &str) -> Item {
        Item {
            id: Some(id.to_string()),
            name: name.to_string(),
            price_a: DEFAULT_PRICE.to_string(),
            price_b: DEFAULT_PRICE.to_string(),
            purchased: false,
        }
    }

    #[test]
    fn deletes_ids_missing_from_client() {
        let server = vec![stored("a", "Arroz"), stored("b", "Feijão")];
        let client = vec![input(Some("a"), Some("Arroz"))];

        let plan = reconcile(&client, &server);

        assert_eq!(plan.to_delete, vec!["b".to_string()]);
        assert_eq!(plan.to_upsert.len(), 1);
        assert_eq!(plan.to_upsert[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn empty_client_list_deletes_everything() {
        let server = vec![stored("a", "Arroz"), stored("b", "Feijão")];
        let plan = reconcile(&[], &server);

        assert_eq!(plan.to_delete.len(), 2);
        assert!(plan.to_upsert.is_empty());
    }

    #[test]
    fn new_items_get_fresh_ids() {
        let plan = reconcile(&[input(None, Some("Leite"))], &[]);

        assert!(plan.to_delete.is_empty());
        let id = plan.to_upsert[0].id.as_deref().unwrap();
        assert!(!id.is_empty());
        // Two reconciliations never hand out the same fresh id
        let again = reconcile(&[input(None, Some("Leite"))], &[]);
        assert_ne!(id, again.to_upsert[0].id.as_deref().unwrap());
    }

    #[test]
    fn nameless_items_are_silently_dropped() {
        let client = vec![
            input(Some("a"), Some("Arroz")),
            input(Some("b"), None),
            input(Some("c"), Some("   ")),
        ];
        let plan = reconcile(&client, &[]);

        assert_eq!(plan.to_upsert.len(), 1);
        assert_eq!(plan.to_upsert[0].name, "Arroz");
    }

    #[test]
    fn dropped_item_id_still_counts_as_present() {
        // A nameless entry keeps its id out of the delete set: the client
        // did mention the id, it just sent a malformed row.
        let server = vec![stored("a", "Arroz")];
        let client = vec![input(Some("a"), None)];

        let plan = reconcile(&client, &server);
        assert!(plan.to_delete.is_empty());
        assert!(plan.to_upsert.is_empty());
    }

    #[test]
    fn missing_prices_get_defaults() {
        let plan = reconcile(&[input(None, Some("Café"))], &[]);
        assert_eq!(plan.to_upsert[0].price_a, DEFAULT_PRICE);
        assert_eq!(plan.to_upsert[0].price_b, DEFAULT_PRICE);
    }

    #[test]
    fn resubmitting_the_same_list_is_a_noop_plan() {
        let server = vec![stored("a", "Arroz"), stored("b", "Feijão")];
        let client = vec![
            input(Some("a"), Some("Arroz")),
            input(Some("b"), Some("Feijão")),
        ];

        let plan = reconcile(&client, &server);
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_upsert, server);
    }
}
