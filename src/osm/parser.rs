use std::collections::BTreeMap;

use crate::api::Element;
use crate::domain::{AirportCollection, Bucket, build_feature};

/// Features grouped into the four exported buckets, in output order
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedCollections {
    collections: BTreeMap<Bucket, AirportCollection>,
}

impl CategorizedCollections {
    pub fn get(&self, bucket: Bucket) -> Option<&AirportCollection> {
        self.collections.get(&bucket)
    }

    /// Iterate buckets as gates, terminals, aprons, parking_stands
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &AirportCollection)> {
        self.collections.iter().map(|(bucket, c)| (*bucket, c))
    }

    pub fn counts(&self) -> Vec<(Bucket, usize)> {
        self.iter().map(|(bucket, c)| (bucket, c.len())).collect()
    }

    pub fn total(&self) -> usize {
        self.collections.values().map(AirportCollection::len).sum()
    }

    /// All features in bucket order, as one collection named `name`
    pub fn combined(&self, name: &str) -> AirportCollection {
        let features = self
            .collections
            .values()
            .flat_map(|c| c.features.iter().cloned())
            .collect();
        AirportCollection::new(name, features)
    }
}

/// Build named collections `{icao}_{bucket}` from Overpass elements.
///
/// Elements without geometry and features of unknown category are skipped.
/// All four buckets are always present.
pub fn build_categorized_geojson(elements: &[Element], icao: &str) -> CategorizedCollections {
    let mut grouped: BTreeMap<Bucket, Vec<_>> =
        Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect();

    for feature in elements.iter().filter_map(build_feature) {
        if let Some(bucket) = feature.category.bucket()
            && let Some(features) = grouped.get_mut(&bucket)
        {
            features.push(feature);
        }
    }

    let collections = grouped
        .into_iter()
        .map(|(bucket, features)| {
            let name = format!("{}_{}", icao, bucket);
            (bucket, AirportCollection::new(name, features))
        })
        .collect();

    CategorizedCollections { collections }
}
