use crate::model::{RelatedTournament, TournamentRecord};
use std::collections::HashMap;

pub const KEY_SEPARATOR: &str = "|";

/// Two records describe the same event exactly when these keys are equal.
#[must_use]
pub fn dedup_key(record: &TournamentRecord) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}",
        record.title,
        record.dates.start_tournament.key_fragment()
    )
}

/// Keeps the first record of every key where it stands and folds the later
/// ones into its `related_tournaments`, in the order they were seen.
#[must_use]
pub fn merge_related(records: Vec<TournamentRecord>) -> Vec<TournamentRecord> {
    let mut primary_at: HashMap<String, usize> = HashMap::new();
    let mut related: HashMap<usize, Vec<RelatedTournament>> = HashMap::new();
    let mut kept: Vec<TournamentRecord> = Vec::with_capacity(records.len());

    for record in records {
        let key = dedup_key(&record);
        if let Some(&position) = primary_at.get(&key) {
            related.entry(position).or_default().push(RelatedTournament {
                id: record.id.unwrap_or_default(),
                round: record.round.as_deref().unwrap_or_default().trim().to_string(),
            });
        } else {
            primary_at.insert(key, kept.len());
            kept.push(record);
        }
    }

    for (position, entries) in related {
        kept[position]
            .related_tournaments
            .get_or_insert_with(Vec::new)
            .extend(entries);
    }
    kept
}
