use crate::core::sections::{ConfigSection, PathRef, SectionKind};
use crate::core::structure::Structure;
use crate::core::tokens::Token;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::{NonZeroU32, NonZeroU64};
use std::path::Path;
use tracing::debug;

/// Prefix of the directive line.
pub const DIRECTIVE_MARKER: &str = "!";
/// Opens a block; the matching close marker is `end`.
pub const BLOCK_MARKER: &str = "%";

/// The complete engine input: directive tokens, blocks, resource settings and geometry.
///
/// Tokens are kept in insertion order and de-duplicated by their
/// case-folded rendered text; re-adding an existing token is a no-op. Adding a
/// section whose name is already present merges the new fields into the
/// existing block instead of emitting a second one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    tokens: Vec<Token>,
    seen: HashSet<String>,
    sections: Vec<ConfigSection>,
    ncores: Option<NonZeroU32>,
    maxcore_mb: Option<NonZeroU64>,
    moinp: Option<PathRef>,
    extra_lines: Vec<String>,
    structure: Option<Structure>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token unless one with the same rendered text is already present.
    ///
    /// Returns whether the token was inserted.
    pub fn add_token(&mut self, token: impl Into<Token>) -> bool {
        let token = token.into();
        if self.seen.insert(dedup_key(&token)) {
            self.tokens.push(token);
            true
        } else {
            false
        }
    }

    pub fn add_tokens<I, T>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        for token in tokens {
            self.add_token(token);
        }
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn contains_token(&self, token: &Token) -> bool {
        self.seen.contains(&dedup_key(token))
    }

    /// Appends a section, or merges it into the existing section of the same name.
    pub fn add_section(&mut self, section: ConfigSection) -> &mut Self {
        match self
            .sections
            .iter_mut()
            .find(|existing| existing.name() == section.name())
        {
            Some(existing) => existing.merge(&section),
            None => self.sections.push(section),
        }
        self
    }

    pub fn add_sections<I>(&mut self, sections: I) -> &mut Self
    where
        I: IntoIterator<Item = ConfigSection>,
    {
        for section in sections {
            self.add_section(section);
        }
        self
    }

    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ConfigSection> {
        self.sections.iter().find(|section| section.kind() == kind)
    }

    pub fn set_ncores(&mut self, ncores: NonZeroU32) -> &mut Self {
        self.ncores = Some(ncores);
        self
    }

    pub fn ncores(&self) -> Option<NonZeroU32> {
        self.ncores
    }

    /// Memory per core in MB.
    pub fn set_maxcore(&mut self, megabytes: NonZeroU64) -> &mut Self {
        self.maxcore_mb = Some(megabytes);
        self
    }

    pub fn maxcore(&self) -> Option<NonZeroU64> {
        self.maxcore_mb
    }

    /// Orbital file used as the SCF starting guess.
    pub fn set_moinp(&mut self, path: PathRef) -> &mut Self {
        self.moinp = Some(path);
        self
    }

    pub fn moinp(&self) -> Option<&PathRef> {
        self.moinp.as_ref()
    }

    /// Raw input lines emitted verbatim after the blocks.
    pub fn add_raw_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.extra_lines.push(line.into());
        self
    }

    pub fn set_structure(&mut self, structure: Structure) -> &mut Self {
        self.structure = Some(structure);
        self
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    /// The directive line: the marker followed by every token, lower-cased.
    pub fn directive_line(&self) -> String {
        let mut line = DIRECTIVE_MARKER.to_string();
        for token in &self.tokens {
            line.push(' ');
            line.push_str(&dedup_key(token));
        }
        line
    }

    /// Renders the document into the engine's input grammar.
    ///
    /// Compilation reads the current state only; calling it repeatedly on an
    /// unchanged document yields identical text.
    pub fn compile(&self) -> String {
        let mut out = self.directive_line();
        out.push('\n');

        if let Some(ncores) = self.ncores {
            out.push_str(&format!("{}pal nprocs {} end\n", BLOCK_MARKER, ncores));
        }
        if let Some(maxcore) = self.maxcore_mb {
            out.push_str(&format!("{}maxcore {}\n", BLOCK_MARKER, maxcore));
        }
        if let Some(moinp) = &self.moinp {
            out.push_str(&format!("{}moinp {}\n", BLOCK_MARKER, moinp));
        }
        for section in &self.sections {
            out.push_str(&section.render_block());
        }
        for line in &self.extra_lines {
            out.push_str(line);
            out.push('\n');
        }
        if let Some(structure) = &self.structure {
            out.push_str(&structure.render());
        }

        debug!(
            tokens = self.tokens.len(),
            sections = self.sections.len(),
            has_structure = self.structure.is_some(),
            "Compiled input document."
        );
        out
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.compile().as_bytes())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

fn dedup_key(token: &Token) -> String {
    token.identity()
}
