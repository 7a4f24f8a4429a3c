use crate::core::io::traits::StructureFile;
use crate::core::structure::Atom;
use crate::core::structure::elements::element_by_symbol_or_number;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Atom count mismatch: header declares {declared}, found {found}")]
    CountMismatch { declared: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
    #[error("Atom line must contain a symbol and three coordinates")]
    TooFewColumns,
    #[error("Missing header line")]
    MissingHeader,
}

pub struct XyzFile;

impl StructureFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Vec<Atom>, Self::Metadata), Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.ok_or(XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::MissingHeader,
        })?;
        let declared: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidCount(count_line.trim().to_string()),
        })?;
        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut atoms = Vec::with_capacity(declared.min(1024));
        for (offset, line_res) in lines.enumerate() {
            let line = line_res?;
            let line_num = offset + 3;
            if line.trim().is_empty() {
                if atoms.len() == declared {
                    break;
                }
                continue;
            }
            if atoms.len() == declared {
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::TooFewColumns,
                });
            }
            let element = element_by_symbol_or_number(parts[0]).map_err(|_| XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::UnknownElement(parts[0].to_string()),
            })?;
            let mut xyz = [0.0; 3];
            for (slot, raw) in xyz.iter_mut().zip(&parts[1..4]) {
                *slot = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| XyzError::Parse {
                        line: line_num,
                        kind: XyzParseErrorKind::InvalidFloat(raw.to_string()),
                    })?;
            }
            atoms.push(Atom::new(element, Point3::new(xyz[0], xyz[1], xyz[2])));
        }

        if atoms.len() != declared {
            return Err(XyzError::CountMismatch {
                declared,
                found: atoms.len(),
            });
        }
        Ok((
            atoms,
            XyzMetadata {
                comment: comment.trim_end().to_string(),
            },
        ))
    }

    fn write_to(
        atoms: &[Atom],
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", atoms.len())?;
        writeln!(writer, "{}", metadata.comment)?;
        for atom in atoms {
            writeln!(
                writer,
                "{:<2} {:>16.10} {:>16.10} {:>16.10}",
                atom.element.symbol(),
                atom.position.x,
                atom.position.y,
                atom.position.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WATER: &str = "3\nwater molecule\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nh 0.0 -0.7572 -0.4692\n";

    #[test]
    fn reads_atoms_and_comment() {
        let (atoms, metadata) = XyzFile::read_from(&mut Cursor::new(WATER)).unwrap();
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].element.symbol(), "O");
        assert_eq!(atoms[2].element.symbol(), "H");
        assert_eq!(atoms[1].position, Point3::new(0.0, 0.7572, -0.4692));
        assert_eq!(metadata.comment, "water molecule");
    }

    #[test]
    fn trailing_blank_lines_and_extra_columns_are_tolerated() {
        let text = "1\n\nC 1.0 2.0 3.0 0.5\n\n\n";
        let (atoms, metadata) = XyzFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(atoms.len(), 1);
        assert!(metadata.comment.is_empty());
    }

    #[test]
    fn invalid_count_is_reported_on_line_one() {
        let err = XyzFile::read_from(&mut Cursor::new("three\n\n")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidCount(_)
            }
        ));
    }

    #[test]
    fn empty_input_is_missing_header() {
        let err = XyzFile::read_from(&mut Cursor::new("")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::MissingHeader,
                ..
            }
        ));
    }

    #[test]
    fn bad_atom_lines_report_their_line_number() {
        let err = XyzFile::read_from(&mut Cursor::new("2\n\nC 0 0 0\nZz 0 0 0\n")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 4,
                kind: XyzParseErrorKind::UnknownElement(_)
            }
        ));

        let err = XyzFile::read_from(&mut Cursor::new("1\n\nC 0 x 0\n")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidFloat(_)
            }
        ));

        let err = XyzFile::read_from(&mut Cursor::new("1\n\nC 0 0\n")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::TooFewColumns,
                ..
            }
        ));
    }

    #[test]
    fn short_files_are_a_count_mismatch() {
        let err = XyzFile::read_from(&mut Cursor::new("3\n\nC 0 0 0\n")).unwrap_err();
        assert!(matches!(
            err,
            XyzError::CountMismatch {
                declared: 3,
                found: 1
            }
        ));
    }

    #[test]
    fn huge_declared_count_is_an_error() {
        let text = format!("{}\ncomment\nH 0 0 0\n", usize::MAX);
        let err = XyzFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            XyzError::CountMismatch { declared, found: 1 } if declared == usize::MAX
        ));
    }

    #[test]
    fn write_then_read_through_a_file_preserves_atoms() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.xyz");
        let (atoms, metadata) = XyzFile::read_from(&mut Cursor::new(WATER)).unwrap();

        XyzFile::write_to_path(&atoms, &metadata, &path).unwrap();
        let (reread, remeta) = XyzFile::read_from_path(&path).unwrap();

        assert_eq!(reread, atoms);
        assert_eq!(remeta, metadata);
    }
}
