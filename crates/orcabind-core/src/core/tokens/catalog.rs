//! Closed keyword catalogues for the directive line.

token_group! {
    /// Electronic-structure methods: Hartree-Fock, density functionals,
    /// composite methods and correlated wavefunction methods.
    pub enum Method("method", parameterizable = false) {
        Hf => ("HF", "hf"),
        Uhf => ("UHF", "uhf"),
        Rohf => ("ROHF", "rohf"),
        Blyp => ("BLYP", "blyp"),
        Bp86 => ("BP86", "bp86"),
        Pbe => ("PBE", "pbe"),
        Tpss => ("TPSS", "tpss"),
        R2scan => ("R2SCAN", "r2scan"),
        B3lyp => ("B3LYP", "b3lyp"),
        Pbe0 => ("PBE0", "pbe0"),
        Tpssh => ("TPSSH", "tpssh"),
        M062x => ("M062X", "m062x"),
        Wb97xV => ("WB97X_V", "wb97x-v"),
        Wb97xD3 => ("WB97X_D3", "wb97x-d3"),
        CamB3lyp => ("CAM_B3LYP", "cam-b3lyp"),
        B2plyp => ("B2PLYP", "b2plyp"),
        R2scan3c => ("R2SCAN_3C", "r2scan-3c"),
        B973c => ("B97_3C", "b97-3c"),
        Pbeh3c => ("PBEH_3C", "pbeh-3c"),
        Hf3c => ("HF_3C", "hf-3c"),
        Gfn2Xtb => ("GFN2_XTB", "gfn2-xtb"),
        Mp2 => ("MP2", "mp2"),
        RiMp2 => ("RI_MP2", "ri-mp2"),
        Ccsd => ("CCSD", "ccsd"),
        CcsdT => ("CCSD_T", "ccsd(t)"),
        DlpnoCcsdT => ("DLPNO_CCSD_T", "dlpno-ccsd(t)"),
        Casscf => ("CASSCF", "casscf"),
        Nevpt2 => ("NEVPT2", "nevpt2"),
    }
}

token_group! {
    /// Orbital basis sets.
    pub enum BasisSet("basis set", parameterizable = false) {
        Sto3g => ("STO_3G", "sto-3g"),
        Pople631gStar => ("POPLE_6_31G_STAR", "6-31g*"),
        Def2Svp => ("DEF2_SVP", "def2-svp"),
        Def2Svpd => ("DEF2_SVPD", "def2-svpd"),
        Def2Tzvp => ("DEF2_TZVP", "def2-tzvp"),
        Def2Tzvpp => ("DEF2_TZVPP", "def2-tzvpp"),
        Def2Qzvp => ("DEF2_QZVP", "def2-qzvp"),
        MaDef2Svp => ("MA_DEF2_SVP", "ma-def2-svp"),
        CcPvdz => ("CC_PVDZ", "cc-pvdz"),
        CcPvtz => ("CC_PVTZ", "cc-pvtz"),
        AugCcPvdz => ("AUG_CC_PVDZ", "aug-cc-pvdz"),
        AugCcPvtz => ("AUG_CC_PVTZ", "aug-cc-pvtz"),
    }
}

token_group! {
    /// Auxiliary basis sets for resolution-of-identity approximations.
    pub enum AuxBasisSet("auxiliary basis set", parameterizable = false) {
        Def2J => ("DEF2_J", "def2/j"),
        Def2Jk => ("DEF2_JK", "def2/jk"),
        Def2SvpC => ("DEF2_SVP_C", "def2-svp/c"),
        Def2TzvpC => ("DEF2_TZVP_C", "def2-tzvp/c"),
        CcPvdzC => ("CC_PVDZ_C", "cc-pvdz/c"),
        CcPvtzC => ("CC_PVTZ_C", "cc-pvtz/c"),
        AutoAux => ("AUTOAUX", "autoaux"),
    }
}

token_group! {
    pub enum Dispersion("dispersion correction", parameterizable = false) {
        D3Zero => ("D3ZERO", "d3zero"),
        D3bj => ("D3BJ", "d3bj"),
        D4 => ("D4", "d4"),
        Nl => ("NL", "nl"),
    }
}

token_group! {
    pub enum Approximation("approximation", parameterizable = false) {
        Ri => ("RI", "ri"),
        RiJcosx => ("RIJCOSX", "rijcosx"),
        RiJk => ("RIJK", "rijk"),
        NoRi => ("NORI", "nori"),
        NoCosx => ("NOCOSX", "nocosx"),
    }
}

token_group! {
    /// Job types.
    pub enum Task("task", parameterizable = false) {
        Sp => ("SP", "sp"),
        Opt => ("OPT", "opt"),
        TightOpt => ("TIGHTOPT", "tightopt"),
        OptTs => ("OPTTS", "optts"),
        Freq => ("FREQ", "freq"),
        NumFreq => ("NUMFREQ", "numfreq"),
        EnGrad => ("ENGRAD", "engrad"),
        NumGrad => ("NUMGRAD", "numgrad"),
        Md => ("MD", "md"),
        Goat => ("GOAT", "goat"),
    }
}

token_group! {
    pub enum ScfConvergence("SCF convergence", parameterizable = false) {
        LooseScf => ("LOOSESCF", "loosescf"),
        NormalScf => ("NORMALSCF", "normalscf"),
        StrongScf => ("STRONGSCF", "strongscf"),
        TightScf => ("TIGHTSCF", "tightscf"),
        VeryTightScf => ("VERYTIGHTSCF", "verytightscf"),
        ExtremeScf => ("EXTREMESCF", "extremescf"),
        SlowConv => ("SLOWCONV", "slowconv"),
        VerySlowConv => ("VERYSLOWCONV", "veryslowconv"),
    }
}

token_group! {
    /// Integration grids for exchange-correlation and COSX.
    pub enum Grid("grid", parameterizable = false) {
        DefGrid1 => ("DEFGRID1", "defgrid1"),
        DefGrid2 => ("DEFGRID2", "defgrid2"),
        DefGrid3 => ("DEFGRID3", "defgrid3"),
    }
}

token_group! {
    /// Implicit solvation models. Each member is called with a [`Solvent`]
    /// token, e.g. `cpcm(water)`.
    pub enum SolvationModel("solvation model", parameterizable = true) {
        Cpcm => ("CPCM", "cpcm"),
        CpcmC => ("CPCMC", "cpcmc"),
        Smd => ("SMD", "smd"),
        Alpb => ("ALPB", "alpb"),
        DdCosmo => ("DDCOSMO", "ddcosmo"),
    }
}

token_group! {
    pub enum Solvent("solvent", parameterizable = false) {
        Water => ("WATER", "water"),
        Methanol => ("METHANOL", "methanol"),
        Ethanol => ("ETHANOL", "ethanol"),
        Acetone => ("ACETONE", "acetone"),
        Acetonitrile => ("ACETONITRILE", "acetonitrile"),
        Dmso => ("DMSO", "dmso"),
        Dmf => ("DMF", "dmf"),
        Thf => ("THF", "thf"),
        Dichloromethane => ("DICHLOROMETHANE", "dichloromethane"),
        Chloroform => ("CHLOROFORM", "chloroform"),
        Toluene => ("TOLUENE", "toluene"),
        Benzene => ("BENZENE", "benzene"),
        Hexane => ("HEXANE", "hexane"),
        Octanol => ("OCTANOL", "octanol"),
    }
}

token_group! {
    /// Print levels and run-control keywords.
    pub enum Misc("miscellaneous", parameterizable = false) {
        NoAutoStart => ("NOAUTOSTART", "noautostart"),
        MiniPrint => ("MINIPRINT", "miniprint"),
        SmallPrint => ("SMALLPRINT", "smallprint"),
        NormalPrint => ("NORMALPRINT", "normalprint"),
        LargePrint => ("LARGEPRINT", "largeprint"),
        NoPop => ("NOPOP", "nopop"),
        Uco => ("UCO", "uco"),
        AllPop => ("ALLPOP", "allpop"),
        Frozencore => ("FROZENCORE", "frozencore"),
        NoFrozencore => ("NOFROZENCORE", "nofrozencore"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::TokenGroup;
    use std::collections::HashSet;

    fn assert_group_is_consistent<G: TokenGroup + std::fmt::Debug>() {
        let mut names = HashSet::new();
        let mut texts = HashSet::new();
        for member in G::MEMBERS.iter().copied() {
            let name = member.member_name();
            assert_eq!(name, name.to_ascii_uppercase(), "{:?}", member);
            assert!(names.insert(name), "duplicate member name {}", name);
            assert!(texts.insert(member.text()), "duplicate text {}", member.text());
            assert_eq!(G::lookup(&name.to_ascii_lowercase()).ok().map(|m| m.member_name()), Some(name));
        }
    }

    #[test]
    fn every_catalogue_has_unique_upper_case_members() {
        assert_group_is_consistent::<Method>();
        assert_group_is_consistent::<BasisSet>();
        assert_group_is_consistent::<AuxBasisSet>();
        assert_group_is_consistent::<Dispersion>();
        assert_group_is_consistent::<Approximation>();
        assert_group_is_consistent::<Task>();
        assert_group_is_consistent::<ScfConvergence>();
        assert_group_is_consistent::<Grid>();
        assert_group_is_consistent::<SolvationModel>();
        assert_group_is_consistent::<Solvent>();
        assert_group_is_consistent::<Misc>();
    }

    #[test]
    fn display_prints_rendered_text() {
        assert_eq!(Method::CcsdT.to_string(), "ccsd(t)");
        assert_eq!(AuxBasisSet::Def2J.to_string(), "def2/j");
    }

    #[test]
    fn only_solvation_models_are_parameterizable() {
        assert!(SolvationModel::Smd.token().is_parameterizable());
        assert!(!Solvent::Water.token().is_parameterizable());
        assert!(!Task::Opt.token().is_parameterizable());
    }
}
