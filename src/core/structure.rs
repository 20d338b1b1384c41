//! Structural model files (PDB) referenced by compound/protein associations.
//!
//! The 3D rendering itself is left to an external viewer; this module only
//! resolves where a model lives and checks that what came back is a PDB file.

use crate::core::{
    http::join_url,
    FloraError,
};

const MIN_PDB_LENGTH: usize = 10;

pub fn structure_url(asset_base: &str, file_name: &str) -> String {
    let mut name = file_name.trim().to_string();
    while name.to_ascii_lowercase().ends_with(".pdb") {
        name.truncate(name.len() - 4);
    }
    join_url(asset_base, &format!("mol-structure/{name}.pdb"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureSummary {
    pub atoms: usize,
    pub hetero_atoms: usize,
    pub has_connect: bool,
    pub has_header: bool,
    pub title: Option<String>,
    pub size: usize,
}

impl StructureSummary {
    pub fn inspect(pdb: &str) -> Result<Self, FloraError> {
        if pdb.trim().len() < MIN_PDB_LENGTH {
            return Err(FloraError::InvalidStructure("file is empty or too short".to_string()));
        }

        let mut summary = StructureSummary { size: pdb.len(), ..Default::default() };
        for line in pdb.lines() {
            let record = line.get(..6).unwrap_or(line).trim_end();
            match record {
                "ATOM" => summary.atoms += 1,
                "HETATM" => summary.hetero_atoms += 1,
                "CONECT" => summary.has_connect = true,
                "HEADER" => summary.has_header = true,
                "TITLE" => {
                    summary.has_header = true;
                    let text = line.get(10..).unwrap_or("").trim();
                    if !text.is_empty() {
                        summary.title = Some(match summary.title.take() {
                            Some(prev) => format!("{prev} {text}"),
                            None => text.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        if summary.atoms + summary.hetero_atoms == 0 {
            return Err(FloraError::InvalidStructure("no ATOM or HETATM records".to_string()));
        }

        Ok(summary)
    }
}
