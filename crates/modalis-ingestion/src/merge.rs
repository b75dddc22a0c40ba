//! Drug ⋈ MoA ⋈ target join.
//!
//! Inner joins on `drugId` then `targetId`. Output order follows the drug
//! table, then MoA order within a drug, then target-row order.

use std::collections::HashMap;

use crate::models::{DrugRow, MergedRow, MoaRow, TargetLocationRow};

pub fn merge_tables(
    drugs: &[DrugRow],
    moa: &[MoaRow],
    targets: &[TargetLocationRow],
) -> Vec<MergedRow> {
    let mut moa_by_drug: HashMap<&str, Vec<&MoaRow>> = HashMap::new();
    for row in moa {
        moa_by_drug.entry(row.drug_id.as_str()).or_default().push(row);
    }

    let mut locations_by_target: HashMap<&str, Vec<&TargetLocationRow>> = HashMap::new();
    for row in targets {
        locations_by_target.entry(row.target_id.as_str()).or_default().push(row);
    }

    let mut merged = Vec::new();
    for drug in drugs {
        let Some(links) = moa_by_drug.get(drug.drug_id.as_str()) else { continue };
        for link in links {
            let Some(locations) = locations_by_target.get(link.target_id.as_str()) else { continue };
            merged.extend(locations.iter().map(|loc| MergedRow {
                drug_id: drug.drug_id.clone(),
                drug_name: drug.drug_name.clone(),
                drug_type: drug.drug_type.clone(),
                target_id: loc.target_id.clone(),
                target_location: loc.target_location.clone(),
                target_location_name: loc.target_location_name.clone(),
                target_location_cluster: loc.target_location_cluster,
            }));
        }
    }

    tracing::debug!(
        "Merged {} drugs × {} links × {} locations → {} rows",
        drugs.len(), moa.len(), targets.len(), merged.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalis_subcell::Cluster;

    fn drug(id: &str, kind: &str) -> DrugRow {
        DrugRow { drug_id: id.into(), drug_name: format!("{id}-name"), drug_type: kind.into() }
    }

    fn link(drug: &str, target: &str) -> MoaRow {
        MoaRow { drug_id: drug.into(), target_id: target.into() }
    }

    fn location(target: &str, code: &str, cluster: Cluster) -> TargetLocationRow {
        TargetLocationRow {
            target_id: target.into(),
            target_location: code.into(),
            target_location_name: String::new(),
            target_location_cluster: cluster,
        }
    }

    #[test]
    fn test_inner_join_order_and_fanout() {
        let drugs = vec![drug("D1", "Antibody"), drug("D2", "Small molecule"), drug("D3", "Protein")];
        let moa = vec![link("D2", "T1"), link("D1", "T2"), link("D1", "T1"), link("D9", "T1")];
        let targets = vec![
            location("T1", "SL-0039", Cluster::Surface),
            location("T1", "SL-0191", Cluster::Nucleus),
            location("T2", "SL-0243", Cluster::Secreted),
        ];

        let merged = merge_tables(&drugs, &moa, &targets);
        let got: Vec<(&str, &str, &str)> = merged
            .iter()
            .map(|r| (r.drug_id.as_str(), r.target_id.as_str(), r.target_location.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("D1", "T2", "SL-0243"),
                ("D1", "T1", "SL-0039"),
                ("D1", "T1", "SL-0191"),
                ("D2", "T1", "SL-0039"),
                ("D2", "T1", "SL-0191"),
            ]
        );
        assert_eq!(merged[0].drug_type, "Antibody");
        assert_eq!(merged[0].target_location_cluster, Cluster::Secreted);
    }

    #[test]
    fn test_targets_without_locations_drop_out() {
        let merged = merge_tables(&[drug("D1", "Antibody")], &[link("D1", "T7")], &[]);
        assert!(merged.is_empty());
    }
}
