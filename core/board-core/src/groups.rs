//! Group partitioning and severity ordering.
//!
//! Splits a snapshot into named groups ordered by a fixed severity
//! precedence. Group names outside the known set sort after all ranked
//! groups, in first-seen order. (The upstream board sorted unknown names
//! *first* because its comparator treated a missing precedence as -1; that
//! was an artifact, not a design goal, and is deliberately redefined here.)

use board_protocol::ResultRecord;

/// Known group names, lowest severity first.
pub const SEVERITY_ORDER: [&str; 4] = ["info", "suggestion", "warning", "error"];

/// One group with its records in original snapshot order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBucket<'a> {
    pub name: &'a str,
    pub records: Vec<&'a ResultRecord>,
}

fn precedence(name: &str) -> usize {
    SEVERITY_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(SEVERITY_ORDER.len())
}

/// Partitions a snapshot into severity-ordered groups.
///
/// Within a group, records keep their snapshot order. The sort is stable, so
/// unranked groups keep their first-seen order relative to each other.
pub fn partition(records: &[ResultRecord]) -> Vec<GroupBucket<'_>> {
    let mut buckets: Vec<GroupBucket<'_>> = Vec::new();

    for record in records {
        match buckets.iter_mut().find(|b| b.name == record.group) {
            Some(bucket) => bucket.records.push(record),
            None => buckets.push(GroupBucket {
                name: &record.group,
                records: vec![record],
            }),
        }
    }

    buckets.sort_by_key(|bucket| precedence(bucket.name));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(group: &str, title: &str) -> ResultRecord {
        ResultRecord {
            group: group.to_string(),
            title: title.to_string(),
            content: format!("content of {}", title),
            ..Default::default()
        }
    }

    #[test]
    fn orders_groups_by_severity() {
        let records = vec![
            record("error", "e1"),
            record("info", "i1"),
            record("warning", "w1"),
        ];
        let groups = partition(&records);
        let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["info", "warning", "error"]);
    }

    #[test]
    fn keeps_snapshot_order_within_group() {
        let records = vec![
            record("info", "first"),
            record("warning", "w"),
            record("info", "second"),
        ];
        let groups = partition(&records);
        let titles: Vec<&str> = groups[0].records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn unranked_groups_sort_after_ranked_in_first_seen_order() {
        let records = vec![
            record("custom-b", "b"),
            record("error", "e"),
            record("custom-a", "a"),
            record("info", "i"),
        ];
        let groups = partition(&records);
        let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["info", "error", "custom-b", "custom-a"]);
    }

    #[test]
    fn empty_snapshot_yields_no_groups() {
        assert!(partition(&[]).is_empty());
    }
}
