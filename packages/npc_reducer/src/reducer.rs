use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde_json::Value;
use tracing::info;

use tool_common::AssetFs;

use crate::LocationKey;

pub const HOME_LOCATION_FIELD: &str = "homeLocationId";
/// Locations with more NPCs than this are cut in half.
pub const CROWDED_THRESHOLD: usize = 2;
/// How many locations the before/after report looks at.
pub const SAMPLE_SIZE: usize = 10;

#[derive(Clone, Debug)]
pub struct Reduction {
    /// Kept records, in their original order.
    pub records: Vec<Value>,
    pub before: BTreeMap<LocationKey, usize>,
    pub after: BTreeMap<LocationKey, usize>,
    original_count: usize,
}

impl Reduction {
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn retained_count(&self) -> usize {
        self.records.len()
    }

    /// Of the first `limit` locations in key order, the ones whose count
    /// changed, as `(key, before, after)`.
    pub fn changed_sample(&self, limit: usize) -> Vec<(&LocationKey, usize, usize)> {
        self.before
            .iter()
            .take(limit)
            .filter_map(|(key, &before)| {
                let after = self.after.get(key).copied().unwrap_or(0);
                (before != after).then_some((key, before, after))
            })
            .collect()
    }
}

fn home_location(record: &Value, index: usize) -> Result<LocationKey> {
    record
        .get(HOME_LOCATION_FIELD)
        .map(LocationKey::new)
        .with_context(|| format!("record {index} has no {HOME_LOCATION_FIELD}"))
}

/// Thin out crowded home locations. A location with `n > 2` records keeps
/// the first `n / 2` of them, everything else is kept as is.
pub fn reduce(records: Vec<Value>) -> Result<Reduction> {
    let keys = records
        .iter()
        .enumerate()
        .map(|(index, record)| home_location(record, index))
        .collect::<Result<Vec<_>>>()?;

    let mut before = BTreeMap::new();
    for key in &keys {
        *before.entry(key.clone()).or_insert(0) += 1;
    }

    let original_count = records.len();
    let mut after = BTreeMap::new();
    let mut retained = vec![];
    for (record, key) in records.into_iter().zip(keys) {
        let total = before[&key];
        let kept = after.entry(key).or_insert(0);
        if total > CROWDED_THRESHOLD && *kept >= total / 2 {
            continue;
        }
        *kept += 1;
        retained.push(record);
    }

    Ok(Reduction {
        records: retained,
        before,
        after,
        original_count,
    })
}

/// Reduce the JSON array stored at `path`. The file is rewritten with the
/// kept records unless `write` is false.
pub fn reduce_file(fs: &dyn AssetFs, path: &Path, write: bool) -> Result<Reduction> {
    let text = fs.read_to_string(path)?;
    let records: Vec<Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;
    let reduction = reduce(records)?;
    if write {
        fs.write(path, &serde_json::to_string_pretty(&reduction.records)?)?;
        info!(
            "Wrote {} of {} records to {}",
            reduction.retained_count(),
            reduction.original_count(),
            path.display()
        );
    } else {
        info!("Dry run, {} left unchanged", path.display());
    }
    Ok(reduction)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tool_common::MemoryFs;

    use super::*;

    fn npcs(homes: &[u64]) -> Vec<Value> {
        homes
            .iter()
            .enumerate()
            .map(|(i, home)| json!({ "id": i, "homeLocationId": home }))
            .collect()
    }

    fn count(reduction: &Reduction, home: Value) -> usize {
        reduction
            .after
            .get(&LocationKey::new(&home))
            .copied()
            .unwrap_or(0)
    }

    #[test]
    fn halves_crowded_locations() -> Result<()> {
        let reduction = reduce(npcs(&[1, 1, 1, 2]))?;
        assert_eq!(reduction.original_count(), 4);
        assert_eq!(reduction.retained_count(), 2);
        let ids = reduction
            .records
            .iter()
            .map(|r| (r["id"].as_u64().unwrap(), r["homeLocationId"].as_u64().unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![(0, 1), (3, 2)]);
        Ok(())
    }

    #[test]
    fn counts_follow_the_halving_rule() -> Result<()> {
        // location n appears n times
        let homes = (1..=9u64)
            .flat_map(|n| std::iter::repeat_n(n, n as usize))
            .collect::<Vec<_>>();
        let reduction = reduce(npcs(&homes))?;
        for n in 1..=9usize {
            let expected = if n <= CROWDED_THRESHOLD { n } else { n / 2 };
            assert_eq!(count(&reduction, json!(n)), expected, "location {n}");
            assert_eq!(reduction.before[&LocationKey::new(&json!(n))], n);
        }
        Ok(())
    }

    #[test]
    fn keeps_the_first_occurrences_in_order() -> Result<()> {
        let records = npcs(&[7, 3, 7, 3, 7, 3, 7, 9]);
        let reduction = reduce(records)?;
        let ids = reduction
            .records
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect::<Vec<_>>();
        // 7 x4 keeps 2, 3 x3 keeps 1, 9 x1 keeps 1
        assert_eq!(ids, vec![0, 1, 2, 7]);
        Ok(())
    }

    #[test]
    fn keys_of_any_type_group_by_value() -> Result<()> {
        let records = vec![
            json!({ "homeLocationId": "inn" }),
            json!({ "homeLocationId": "inn" }),
            json!({ "homeLocationId": "inn" }),
            json!({ "homeLocationId": null }),
            json!({ "homeLocationId": 4 }),
            json!({ "homeLocationId": "4" }),
        ];
        let reduction = reduce(records)?;
        assert_eq!(count(&reduction, json!("inn")), 1);
        assert_eq!(count(&reduction, json!(null)), 1);
        assert_eq!(count(&reduction, json!(4)), 1);
        assert_eq!(count(&reduction, json!("4")), 1);
        Ok(())
    }

    #[test]
    fn integral_floats_share_a_location_with_integers() -> Result<()> {
        let records = vec![
            json!({ "homeLocationId": 5 }),
            json!({ "homeLocationId": 5.0 }),
            json!({ "homeLocationId": 5 }),
        ];
        let reduction = reduce(records)?;
        assert_eq!(reduction.before.len(), 1);
        assert_eq!(reduction.retained_count(), 1);
        assert_eq!(reduction.records[0]["homeLocationId"], 5);
        Ok(())
    }

    #[test]
    fn missing_home_location_is_an_error() {
        let records = vec![json!({ "homeLocationId": 1 }), json!({ "name": "ghost" })];
        let err = reduce(records).unwrap_err();
        assert!(err.to_string().contains("record 1"));
        assert!(reduce(vec![json!(5)]).is_err());
    }

    #[test]
    fn sample_lists_changed_locations_among_the_first_keys() -> Result<()> {
        let mut homes = vec![];
        for n in 1..=12u64 {
            homes.extend(std::iter::repeat_n(n, 3));
        }
        homes.extend([0, 0]);
        let reduction = reduce(npcs(&homes))?;
        let sample = reduction.changed_sample(SAMPLE_SIZE);
        // key 0 is among the first ten but did not change
        assert_eq!(sample.len(), 9);
        assert_eq!(sample[0].0.to_string(), "1");
        assert_eq!((sample[0].1, sample[0].2), (3, 1));
        assert_eq!(sample[8].0.to_string(), "9");
        Ok(())
    }

    #[test]
    fn rewrites_the_file_with_two_space_indent() -> Result<()> {
        let input = serde_json::to_string(&vec![
            json!({ "homeLocationId": 1, "name": "a" }),
            json!({ "homeLocationId": 1, "name": "b" }),
            json!({ "homeLocationId": 1, "name": "c" }),
        ])?;
        let fs = MemoryFs::new().with_file("/game/Data/NPCs.json", &input);
        let path = Path::new("/game/Data/NPCs.json");

        let dry = reduce_file(&fs, path, false)?;
        assert_eq!(dry.retained_count(), 1);
        assert_eq!(fs.file_contents(path).as_deref(), Some(input.as_str()));

        reduce_file(&fs, path, true)?;
        assert_eq!(
            fs.file_contents(path).as_deref(),
            Some("[\n  {\n    \"homeLocationId\": 1,\n    \"name\": \"a\"\n  }\n]")
        );
        Ok(())
    }

    #[test]
    fn bad_input_files_are_fatal() {
        let fs = MemoryFs::new()
            .with_file("/d/object.json", "{\"homeLocationId\": 1}")
            .with_file("/d/broken.json", "[{\"homeLocationId\": 1},");
        assert!(reduce_file(&fs, Path::new("/d/object.json"), true).is_err());
        assert!(reduce_file(&fs, Path::new("/d/broken.json"), true).is_err());
        assert!(reduce_file(&fs, Path::new("/d/missing.json"), true).is_err());
        assert_eq!(
            fs.file_contents("/d/object.json").as_deref(),
            Some("{\"homeLocationId\": 1}")
        );
    }
}
