//! Keywords of the engine's directive line.
//!
//! A [`Token`] is a single word such as `b3lyp` or `tightscf`. Tokens the
//! binding knows about live in closed catalogues (see [`catalog`]), one enum per
//! [`TokenGroup`], which gives exhaustive matching and case-insensitive lookup
//! from user-provided strings. Arbitrary words can still be expressed through
//! [`Token::new`] for keywords the catalogues do not cover.

use thiserror::Error;

mod token;

pub use token::Token;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token '{token}' cannot be called with '{argument}': it is not parameterizable")]
    TypeMismatch { token: String, argument: String },
    #[error("'{name}' is not a member of the {group} catalogue")]
    UnknownMember { group: &'static str, name: String },
    #[error("Malformed token expression '{0}'")]
    Malformed(String),
}

/// A named, closed enumeration of tokens.
///
/// Implementations are generated by `token_group!`; members are identified by an
/// upper-case member name (`DEF2_SVP`) that is distinct from the rendered text
/// (`def2-svp`).
pub trait TokenGroup: Copy + Sized + 'static {
    const GROUP: &'static str;
    const MEMBERS: &'static [Self];

    fn member_name(self) -> &'static str;

    fn text(self) -> &'static str;

    fn is_parameterizable(self) -> bool;

    fn token(self) -> Token {
        if self.is_parameterizable() {
            Token::parameterizable(self.text())
        } else {
            Token::new(self.text())
        }
    }

    /// Case-insensitive exact lookup against the member names.
    ///
    /// The input is case-folded once and compared against the canonical
    /// upper-case member names.
    fn lookup(name: &str) -> Result<Self, TokenError> {
        let key = name.trim().to_ascii_uppercase();
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.member_name() == key)
            .ok_or_else(|| TokenError::UnknownMember {
                group: Self::GROUP,
                name: name.to_string(),
            })
    }

    fn token_from_str(name: &str) -> Result<Token, TokenError> {
        Self::lookup(name).map(Self::token)
    }

    /// Finds a member by either its member name or its rendered text.
    fn find(word: &str) -> Option<Self> {
        Self::lookup(word).ok().or_else(|| {
            Self::MEMBERS
                .iter()
                .copied()
                .find(|member| member.text().eq_ignore_ascii_case(word.trim()))
        })
    }
}

/// Declares a closed token catalogue as an enum implementing [`TokenGroup`].
///
/// Each member is written as `Variant => ("MEMBER_NAME", "rendered text")`.
macro_rules! token_group {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($group:literal, parameterizable = $param:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => ($member:literal, $text:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::core::tokens::TokenGroup for $name {
            const GROUP: &'static str = $group;
            const MEMBERS: &'static [Self] = &[ $( Self::$variant ),+ ];

            fn member_name(self) -> &'static str {
                match self {
                    $( Self::$variant => $member ),+
                }
            }

            fn text(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            fn is_parameterizable(self) -> bool {
                $param
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::core::tokens::TokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::core::tokens::TokenGroup>::lookup(s)
            }
        }

        impl From<$name> for $crate::core::tokens::Token {
            fn from(member: $name) -> Self {
                <$name as $crate::core::tokens::TokenGroup>::token(member)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<Self as $crate::core::tokens::TokenGroup>::text(*self))
            }
        }
    };
}

pub mod catalog;

/// Resolves a word from any catalogue, by member name or rendered text.
pub fn lookup_any(word: &str) -> Option<Token> {
    use catalog::*;

    fn find<G: TokenGroup>(word: &str) -> Option<Token> {
        G::find(word).map(G::token)
    }

    find::<Method>(word)
        .or_else(|| find::<BasisSet>(word))
        .or_else(|| find::<AuxBasisSet>(word))
        .or_else(|| find::<Dispersion>(word))
        .or_else(|| find::<Approximation>(word))
        .or_else(|| find::<Task>(word))
        .or_else(|| find::<ScfConvergence>(word))
        .or_else(|| find::<Grid>(word))
        .or_else(|| find::<SolvationModel>(word))
        .or_else(|| find::<Solvent>(word))
        .or_else(|| find::<Misc>(word))
}

/// Parses a token expression such as `b3lyp`, `DEF2_SVP` or `cpcm(water)`.
///
/// Known words resolve through the catalogues; unknown plain words become
/// custom tokens. Parameterized expressions require the outer word to be a
/// parameterizable catalogue member.
pub fn resolve_token(expr: &str) -> Result<Token, TokenError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(TokenError::Malformed(expr.to_string()));
    }

    if let Some(token) = lookup_any(expr) {
        return Ok(token);
    }

    match expr.find('(') {
        None => {
            if expr.contains(')') || expr.contains(char::is_whitespace) {
                return Err(TokenError::Malformed(expr.to_string()));
            }
            Ok(Token::new(expr))
        }
        Some(open) => {
            let inner = expr[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| TokenError::Malformed(expr.to_string()))?;
            let outer = &expr[..open];
            if outer.trim().is_empty() || inner.trim().is_empty() {
                return Err(TokenError::Malformed(expr.to_string()));
            }
            let head = lookup_any(outer).unwrap_or_else(|| Token::new(outer));
            head.call(resolve_token(inner)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::{BasisSet, Method, SolvationModel, Solvent};
    use super::*;

    #[test]
    fn group_lookup_is_case_insensitive_on_member_names() {
        assert_eq!(BasisSet::lookup("def2_svp"), Ok(BasisSet::Def2Svp));
        assert_eq!(BasisSet::lookup("DEF2_SVP"), Ok(BasisSet::Def2Svp));
        assert_eq!(BasisSet::lookup("Def2_Svp"), Ok(BasisSet::Def2Svp));
        assert_eq!("b3lyp".parse::<Method>(), Ok(Method::B3lyp));
    }

    #[test]
    fn group_lookup_does_not_match_rendered_text() {
        assert_eq!(
            BasisSet::lookup("def2-svp"),
            Err(TokenError::UnknownMember {
                group: "basis set",
                name: "def2-svp".into()
            })
        );
    }

    #[test]
    fn group_lookup_rejects_unknown_members() {
        assert!(matches!(
            Method::lookup("NOT_A_METHOD"),
            Err(TokenError::UnknownMember { group: "method", .. })
        ));
    }

    #[test]
    fn token_from_str_returns_the_stored_token() {
        let token = BasisSet::token_from_str("def2_tzvp").unwrap();
        assert_eq!(token.render(), "def2-tzvp");
    }

    #[test]
    fn solvation_models_are_parameterizable_with_solvents() {
        let token = SolvationModel::Cpcm.token().call(Solvent::Water).unwrap();
        assert_eq!(token.render(), "cpcm(water)");
    }

    #[test]
    fn catalogue_members_from_plain_groups_reject_calls() {
        assert!(matches!(
            Method::B3lyp.token().call(Solvent::Water),
            Err(TokenError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn resolve_token_handles_member_names_texts_and_custom_words() {
        assert_eq!(resolve_token("DEF2_SVP").unwrap().render(), "def2-svp");
        assert_eq!(resolve_token("def2-svp").unwrap().render(), "def2-svp");
        assert_eq!(resolve_token("B3LYP").unwrap().render(), "b3lyp");
        assert_eq!(resolve_token("keepdens").unwrap().render(), "keepdens");
    }

    #[test]
    fn resolve_token_parses_parameterized_expressions() {
        assert_eq!(resolve_token("CPCM(WATER)").unwrap().render(), "cpcm(water)");
        assert_eq!(
            resolve_token("smd(toluene)").unwrap().render(),
            "smd(toluene)"
        );
    }

    #[test]
    fn resolve_token_rejects_calls_on_plain_words() {
        assert!(matches!(
            resolve_token("b3lyp(water)"),
            Err(TokenError::TypeMismatch { .. })
        ));
        assert!(matches!(
            resolve_token("mystery(water)"),
            Err(TokenError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn resolve_token_rejects_malformed_expressions() {
        for expr in ["", "cpcm(water", "cpcm()", "(water)", "two words", "water)"] {
            assert!(
                matches!(resolve_token(expr), Err(TokenError::Malformed(_))),
                "expected '{}' to be malformed",
                expr
            );
        }
    }
}
