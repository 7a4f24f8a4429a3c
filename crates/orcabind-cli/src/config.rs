use crate::error::{CliError, Result};
use orcabind::core::document::ConfigDocument;
use orcabind::core::io::traits::StructureFile;
use orcabind::core::io::xyz::XyzFile;
use orcabind::core::sections::{ConfigSection, PathRef, RawValue, SectionKind};
use orcabind::core::structure::Structure;
use orcabind::core::tokens::resolve_token;
use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_multiplicity() -> u32 {
    1
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileStructure {
    #[serde(default)]
    pub charge: i32,
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u32,
    /// Read now and embedded into the input.
    #[serde(rename = "xyz-file")]
    pub xyz_file: Option<PathBuf>,
    /// Referenced from the input and read by the engine.
    #[serde(rename = "external-xyz")]
    pub external_xyz: Option<String>,
}

/// A calculation described in TOML.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    pub basename: Option<String>,
    #[serde(default)]
    pub tokens: Vec<String>,
    pub ncores: Option<NonZeroU32>,
    /// Memory per core in MB.
    pub maxcore: Option<NonZeroU64>,
    pub moinp: Option<String>,
    #[serde(default, rename = "raw-lines")]
    pub raw_lines: Vec<String>,
    #[serde(default)]
    pub sections: toml::Table,
    pub structure: Option<FileStructure>,
}

impl JobFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading job description from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Builds the input document. Relative structure paths resolve against `base_dir`.
    pub fn to_document(&self, base_dir: &Path) -> Result<ConfigDocument> {
        let mut document = ConfigDocument::new();

        for word in &self.tokens {
            document.add_token(resolve_token(word)?);
        }

        for (name, fields) in &self.sections {
            let kind: SectionKind = name
                .parse()
                .map_err(|e| CliError::Config(format!("{e}")))?;
            let fields = fields.as_table().ok_or_else(|| {
                CliError::Config(format!("[sections.{name}] must be a table of fields"))
            })?;
            let mut section = ConfigSection::new(kind);
            for (field, value) in fields {
                let raw: RawValue = value.clone().try_into().map_err(|e| {
                    CliError::Config(format!("Unsupported value for '{name}.{field}': {e}"))
                })?;
                section.set(field, raw)?;
            }
            document.add_section(section);
        }

        if let Some(ncores) = self.ncores {
            document.set_ncores(ncores);
        }
        if let Some(maxcore) = self.maxcore {
            document.set_maxcore(maxcore);
        }
        if let Some(moinp) = &self.moinp {
            document.set_moinp(
                PathRef::new(moinp).map_err(|e| CliError::Config(format!("moinp: {e}")))?,
            );
        }
        for line in &self.raw_lines {
            document.add_raw_line(line.clone());
        }
        if let Some(structure) = &self.structure {
            document.set_structure(structure.load(base_dir)?);
        }

        Ok(document)
    }
}

impl FileStructure {
    fn load(&self, base_dir: &Path) -> Result<Structure> {
        match (&self.xyz_file, &self.external_xyz) {
            (Some(path), None) => {
                let path = base_dir.join(path);
                let (atoms, _) =
                    XyzFile::read_from_path(&path).map_err(|e| CliError::FileParsing {
                        path: path.clone(),
                        source: e.into(),
                    })?;
                Ok(Structure::new(atoms, self.charge, self.multiplicity)?)
            }
            (None, Some(path)) => {
                let path = PathRef::new(path)
                    .map_err(|e| CliError::Config(format!("external-xyz: {e}")))?;
                Ok(Structure::from_xyz_file(path, self.charge, self.multiplicity)?)
            }
            _ => Err(CliError::Config(
                "[structure] needs exactly one of 'xyz-file' or 'external-xyz'".to_string(),
            )),
        }
    }
}

/// A `SECTION.FIELD=VALUE` override from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOverride {
    pub section: SectionKind,
    pub field: String,
    pub value: RawValue,
}

#[derive(Deserialize)]
struct OverrideValue {
    value: RawValue,
}

impl FieldOverride {
    /// The value is read as a TOML literal; anything that is not one is kept as a bare string.
    pub fn parse(raw: &str) -> Result<Self> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::Argument(format!("expected SECTION.FIELD=VALUE, got '{raw}'")))?;
        let (section, field) = key.trim().split_once('.').ok_or_else(|| {
            CliError::Argument(format!("expected SECTION.FIELD before '=', got '{key}'"))
        })?;
        let section: SectionKind = section
            .parse()
            .map_err(|e| CliError::Argument(format!("{e}")))?;
        let value = value.trim();
        let value = toml::from_str::<OverrideValue>(&format!("value = {value}"))
            .map(|parsed| parsed.value)
            .unwrap_or_else(|_| RawValue::from(value));
        Ok(Self {
            section,
            field: field.trim().to_string(),
            value,
        })
    }

    pub fn apply(&self, document: &mut ConfigDocument) -> Result<()> {
        let mut section = ConfigSection::new(self.section);
        section.set(&self.field, self.value.clone())?;
        document.add_section(section);
        Ok(())
    }
}

/// Loads a job file, builds its document and applies command-line overrides.
pub fn load_job(path: &Path, overrides: &[String]) -> Result<(JobFile, ConfigDocument)> {
    let job = JobFile::from_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut document = job.to_document(base_dir)?;
    for raw in overrides {
        FieldOverride::parse(raw)?.apply(&mut document)?;
    }
    Ok((job, document))
}
