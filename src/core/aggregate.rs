// aggregate.rs - Grouping assignment records into numbered clusters

use std::collections::HashMap;

use crate::data::record::{AssignmentRecord, SequenceId};
use crate::error::PipelineError;

/// One numbered cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// 1-based, in order of the representative's first appearance
    pub number: usize,
    pub representative: SequenceId,
    /// Insertion order, each identifier once
    pub members: Vec<SequenceId>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1 && self.members[0] == self.representative
    }
}

/// Finalized clusters of one run. Clusters are disjoint over members and
/// stored by ascending number.
#[derive(Debug, Clone, Default)]
pub struct ClusterCollection {
    clusters: Vec<Cluster>,
    member_index: HashMap<SequenceId, usize>,
}

impl ClusterCollection {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn as_slice(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Look up a cluster by its number
    pub fn get(&self, number: usize) -> Option<&Cluster> {
        number.checked_sub(1).and_then(|i| self.clusters.get(i))
    }

    /// Cluster containing the given member
    pub fn cluster_of(&self, member: &str) -> Option<&Cluster> {
        self.member_index.get(member).map(|&i| &self.clusters[i])
    }

    /// Distinct member identifiers across all clusters
    pub fn total_members(&self) -> usize {
        self.member_index.len()
    }

    pub fn singleton_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_singleton()).count()
    }

    /// Largest cluster; ties go to the lowest number
    pub fn largest(&self) -> Option<&Cluster> {
        self.clusters
            .iter()
            .fold(None, |best: Option<&Cluster>, c| match best {
                Some(b) if b.size() >= c.size() => Some(b),
                _ => Some(c),
            })
    }
}

impl<'a> IntoIterator for &'a ClusterCollection {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

/// Builds a `ClusterCollection` from a stream of records.
///
/// Cluster numbers follow first appearance of each representative and never
/// depend on hashing or sorting, so identical tables give identical numbering.
/// A member claimed by two representatives is kept as a conflict and reported
/// by `finish`, never resolved.
#[derive(Debug, Default)]
pub struct ClusterAggregator {
    clusters: Vec<Cluster>,
    by_representative: HashMap<SequenceId, usize>,
    member_index: HashMap<SequenceId, usize>,
    conflict: Option<(SequenceId, SequenceId, SequenceId)>,
    records_seen: usize,
    repeated_pairs: usize,
}

impl ClusterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one record
    pub fn push(&mut self, record: AssignmentRecord) {
        self.records_seen += 1;
        let AssignmentRecord {
            representative,
            member,
        } = record;

        let cluster_idx = match self.by_representative.get(&representative) {
            Some(&idx) => idx,
            None => {
                let idx = self.clusters.len();
                log::trace!("cluster {} opened for representative '{}'", idx + 1, representative);
                self.clusters.push(Cluster {
                    number: idx + 1,
                    representative: representative.clone(),
                    members: Vec::new(),
                });
                self.by_representative.insert(representative.clone(), idx);
                idx
            }
        };

        match self.member_index.get(&member) {
            Some(&existing) if existing == cluster_idx => {
                // identical pair repeated
                self.repeated_pairs += 1;
            }
            Some(&existing) => {
                if self.conflict.is_none() {
                    let first = self.clusters[existing].representative.clone();
                    log::debug!(
                        "member '{}' claimed by '{}' and '{}'",
                        member,
                        first,
                        representative
                    );
                    self.conflict = Some((member, first, representative));
                }
            }
            None => {
                self.member_index.insert(member.clone(), cluster_idx);
                self.clusters[cluster_idx].members.push(member);
            }
        }
    }

    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Identical (representative, member) pairs that were absorbed
    pub fn repeated_pairs(&self) -> usize {
        self.repeated_pairs
    }

    /// Validate the partition and freeze the clusters
    pub fn finish(self) -> Result<ClusterCollection, PipelineError> {
        if let Some((member, first_representative, second_representative)) = self.conflict {
            return Err(PipelineError::DuplicateMembership {
                member,
                first_representative,
                second_representative,
            });
        }

        debug_assert_eq!(
            self.clusters.iter().map(|c| c.members.len()).sum::<usize>(),
            self.member_index.len()
        );

        Ok(ClusterCollection {
            clusters: self.clusters,
            member_index: self.member_index,
        })
    }
}

/// Aggregate a full record stream, stopping at the first reader error
pub fn aggregate_records<I>(records: I) -> Result<ClusterCollection, PipelineError>
where
    I: IntoIterator<Item = Result<AssignmentRecord, PipelineError>>,
{
    let mut aggregator = ClusterAggregator::new();
    for record in records {
        aggregator.push(record?);
    }
    if aggregator.repeated_pairs() > 0 {
        log::debug!("{} repeated assignment pairs ignored", aggregator.repeated_pairs());
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn build(pairs: &[(&str, &str)]) -> Result<ClusterCollection, PipelineError> {
        aggregate_records(pairs.iter().map(|(r, m)| Ok(AssignmentRecord::new(*r, *m))))
    }

    fn members(cluster: &Cluster) -> Vec<&str> {
        cluster.members.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_reference_example() {
        let clusters = build(&[("R1", "R1"), ("R1", "M1"), ("R1", "M2"), ("M3", "M3")]).unwrap();

        assert_eq!(clusters.len(), 2);
        let first = clusters.get(1).unwrap();
        assert_eq!(first.representative, "R1");
        assert_eq!(members(first), vec!["R1", "M1", "M2"]);
        let second = clusters.get(2).unwrap();
        assert_eq!(members(second), vec!["M3"]);
        assert!(second.is_singleton());
        assert!(clusters.get(0).is_none());
        assert!(clusters.get(3).is_none());
    }

    #[test]
    fn test_singletons_numbered_in_order() {
        let clusters = build(&[("A", "A"), ("B", "B"), ("C", "C")]).unwrap();

        let numbered: Vec<(usize, &str)> = clusters
            .iter()
            .map(|c| (c.number, c.representative.as_str()))
            .collect();
        assert_eq!(numbered, vec![(1, "A"), (2, "B"), (3, "C")]);
        assert!(clusters.iter().all(|c| c.size() == 1));
        assert_eq!(clusters.singleton_count(), 3);
    }

    #[test]
    fn test_numbering_follows_first_appearance_not_sort_order() {
        let clusters = build(&[
            ("zeta", "zeta"),
            ("alpha", "alpha"),
            ("zeta", "z2"),
            ("mid", "mid"),
            ("alpha", "a2"),
        ])
        .unwrap();

        let reps: Vec<&str> = clusters.iter().map(|c| c.representative.as_str()).collect();
        assert_eq!(reps, vec!["zeta", "alpha", "mid"]);
        let numbers: Vec<usize> = clusters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_interleaved_members_keep_insertion_order() {
        let clusters = build(&[("R", "R"), ("S", "S"), ("R", "x"), ("S", "y"), ("R", "w")]).unwrap();
        assert_eq!(members(clusters.get(1).unwrap()), vec!["R", "x", "w"]);
        assert_eq!(members(clusters.get(2).unwrap()), vec!["S", "y"]);
    }

    #[test]
    fn test_duplicate_membership_names_member() {
        let err = build(&[("A", "A"), ("C", "C"), ("B", "A")]).unwrap_err();
        match err {
            PipelineError::DuplicateMembership {
                member,
                first_representative,
                second_representative,
            } => {
                assert_eq!(member, "A");
                assert_eq!(first_representative, "A");
                assert_eq!(second_representative, "B");
            }
            other => panic!("expected DuplicateMembership, got {:?}", other),
        }
    }

    #[test]
    fn test_first_conflict_is_reported() {
        let err = build(&[("A", "x"), ("B", "x"), ("A", "y"), ("C", "y")]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateMembership { ref member, .. } if member == "x"));
    }

    #[test]
    fn test_identical_pair_is_idempotent() {
        let mut aggregator = ClusterAggregator::new();
        for (r, m) in [("A", "A"), ("A", "B"), ("A", "B"), ("A", "A")] {
            aggregator.push(AssignmentRecord::new(r, m));
        }
        assert_eq!(aggregator.records_seen(), 4);
        assert_eq!(aggregator.repeated_pairs(), 2);

        let clusters = aggregator.finish().unwrap();
        assert_eq!(members(clusters.get(1).unwrap()), vec!["A", "B"]);
    }

    #[test]
    fn test_partition_property() {
        let pairs = [
            ("r1", "r1"),
            ("r1", "m1"),
            ("r2", "r2"),
            ("r1", "m2"),
            ("r3", "r3"),
            ("r2", "m3"),
        ];
        let clusters = build(&pairs).unwrap();

        let input_members: HashSet<&str> = pairs.iter().map(|(_, m)| *m).collect();
        let mut seen = HashSet::new();
        for cluster in &clusters {
            for member in &cluster.members {
                assert!(seen.insert(member.as_str()), "{} listed twice", member);
                assert_eq!(clusters.cluster_of(member).unwrap().number, cluster.number);
            }
        }
        assert_eq!(seen, input_members);
        assert_eq!(clusters.total_members(), input_members.len());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let pairs = [("b", "b"), ("a", "a"), ("b", "c"), ("d", "d"), ("a", "e")];
        let first = build(&pairs).unwrap();
        let second = build(&pairs).unwrap();
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn test_representative_without_self_record() {
        let clusters = build(&[("R", "m1"), ("R", "m2")]).unwrap();
        let cluster = clusters.get(1).unwrap();
        assert_eq!(cluster.representative, "R");
        assert_eq!(members(cluster), vec!["m1", "m2"]);
        assert!(clusters.cluster_of("R").is_none());
    }

    #[test]
    fn test_largest_prefers_lowest_number_on_tie() {
        let clusters = build(&[("A", "A"), ("A", "a"), ("B", "B"), ("B", "b"), ("C", "C")]).unwrap();
        assert_eq!(clusters.largest().unwrap().number, 1);
    }

    #[test]
    fn test_reader_error_propagates() {
        let records = vec![
            Ok(AssignmentRecord::new("A", "A")),
            Err(PipelineError::MalformedRecord {
                line: 2,
                content: "bad".to_string(),
            }),
        ];
        let err = aggregate_records(records).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { line: 2, .. }));
    }
}
