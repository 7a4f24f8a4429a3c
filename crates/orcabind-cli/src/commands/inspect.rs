use crate::cli::InspectArgs;
use crate::error::Result;
use orcabind::core::results::{
    DecodeOptions, GbwResults, PropertyResults, TaggedVariant, load_document,
};
use orcabind::core::structure::units::HARTREE_TO_EV;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    let options = decode_options(args.skip_unknown);

    if let Some(path) = &args.property {
        info!("Decoding property document {:?}", path);
        let results: PropertyResults = load_document(path, &options)?;
        print!("{}", summarize_properties(&results));
    }
    if let Some(path) = &args.gbw {
        info!("Decoding wavefunction document {:?}", path);
        let results: GbwResults = load_document(path, &options)?;
        print!("{}", summarize_gbw(&results));
    }
    Ok(())
}

pub fn decode_options(skip_unknown: bool) -> DecodeOptions {
    if skip_unknown {
        DecodeOptions::skipping_unknown_variants()
    } else {
        DecodeOptions::default()
    }
}

pub fn summarize_properties(results: &PropertyResults) -> String {
    let mut out = String::new();
    if let Some(status) = &results.calculation_status {
        out.push_str(&format!(
            "Status: {} (version {})\n",
            status.status.as_deref().unwrap_or("unknown"),
            status.version.as_deref().unwrap_or("unknown")
        ));
    }
    for (index, geometry) in results.geometries().iter().enumerate() {
        let methods: Vec<&str> = geometry
            .energy
            .iter()
            .flatten()
            .map(TaggedVariant::tag)
            .collect();
        match geometry.total_energy() {
            Some(energy) => out.push_str(&format!(
                "Geometry {}: E = {:.10} Eh ({:.6} eV) [{}]\n",
                index + 1,
                energy,
                energy * HARTREE_TO_EV,
                methods.join(", ")
            )),
            None => out.push_str(&format!("Geometry {}: no energy reported\n", index + 1)),
        }
    }
    if let Some(energy) = results.final_energy() {
        out.push_str(&format!("Final energy: {:.10} Eh\n", energy));
    }
    out
}

pub fn summarize_gbw(results: &GbwResults) -> String {
    let mut out = String::new();
    let Some(molecule) = &results.molecule else {
        return "No molecule in wavefunction document.\n".to_string();
    };
    out.push_str(&format!(
        "Atoms: {}, charge {}, multiplicity {}\n",
        molecule.atoms.as_ref().map_or(0, Vec::len),
        molecule.charge.unwrap_or_default(),
        molecule.multiplicity.unwrap_or(1)
    ));
    if let Some(orbitals) = results.orbitals() {
        out.push_str(&format!("Orbitals: {}\n", orbitals.mos().len()));
        let energies = [
            ("HOMO", orbitals.homo().and_then(|mo| mo.orbitalenergy)),
            ("LUMO", orbitals.lumo().and_then(|mo| mo.orbitalenergy)),
            ("Gap", orbitals.gap()),
        ];
        for (label, energy) in energies {
            if let Some(energy) = energy {
                out.push_str(&format!(
                    "{label}: {:.6} Eh ({:.4} eV)\n",
                    energy,
                    energy * HARTREE_TO_EV
                ));
            }
        }
    }
    out
}
