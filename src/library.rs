// Reference-library name checks.

use crate::api::{EnrichrClient, Transport};
use crate::error::{EnrichrError, Result};
use tracing::{debug, info};

/// Libraries accepted without asking the server. Any other name is looked
/// up in the live catalog.
pub const DEFAULT_LIBRARIES: &[&str] = &[
    "ChEA_2015",
    "Chromosome_Location",
    "ENCODE_Histone_Modifications_2015",
    "ENCODE_TF_ChIP-seq_2015",
    "GO_Biological_Process_2015",
    "GO_Cellular_Component_2015",
    "GO_Molecular_Function_2015",
    "GeneSigDB",
    "HMDB_Metabolites",
    "HumanCyc_2015",
    "Human_Gene_Atlas",
    "Human_Phenotype_Ontology",
    "KEA_2015",
    "KEGG_2016",
    "MGI_Mammalian_Phenotype_Level_4",
    "MSigDB_Computational",
    "MSigDB_Oncogenic_Signatures",
    "Mouse_Gene_Atlas",
    "OMIM_Disease",
    "OMIM_Expanded",
    "Panther_2016",
    "Reactome_2016",
    "TRANSFAC_and_JASPAR_PWMs",
    "Tissue_Protein_Expression_from_Human_Proteome_Map",
    "WikiPathways_2016",
];

pub fn is_default_library(name: &str) -> bool {
    DEFAULT_LIBRARIES.contains(&name)
}

/// Fetch the server's current catalog of library names, sorted.
pub fn get_libraries<T: Transport>(client: &EnrichrClient<T>) -> Result<Vec<String>> {
    info!("Connecting to Enrichr server to get latest library names");
    let names = client.libraries()?;
    debug!(count = names.len(), "Fetched library catalog");
    Ok(names)
}

/// Check that `name` is a library the server can enrich against.
pub fn resolve_library<T: Transport>(name: &str, client: &EnrichrClient<T>) -> Result<()> {
    if is_default_library(name) {
        debug!(library = name, "Library found in default set");
        return Ok(());
    }
    let catalog = get_libraries(client)?;
    if catalog.iter().any(|n| n == name) {
        Ok(())
    } else {
        Err(EnrichrError::UnknownLibrary {
            name: name.to_string(),
        })
    }
}
