//! Operation taxonomy: the fixed catalogue of corporate operations a gazette
//! notice can describe.
//!
//! Each [`OperationKind`] has a stable snake_case id (used in JSON output and
//! on the command line), a Romanian display name, and a [`Category`].
//! [`PRIORITY_ORDER`] lists kinds in the order the classifier evaluates them.
//! [`NOISE_KINDS`] and [`HIGH_INTEREST_KINDS`] are editorial subsets defined
//! independently of that order.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::GazetteError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Broad family an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    CapitalFinance,
    Structure,
    OfficeBranches,
    Administration,
    BusinessPurpose,
    Other,
    Unclassified,
}

impl Category {
    /// Display label as printed in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::CapitalFinance => "Capital și finanțare",
            Self::Structure => "Structură societate",
            Self::OfficeBranches => "Sediu și puncte de lucru",
            Self::Administration => "Administrație",
            Self::BusinessPurpose => "Obiect de activitate",
            Self::Other => "Alte operațiuni",
            Self::Unclassified => "Altele",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// A corporate operation recognised in a gazette notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    // Combined operations
    CapitalIncreaseDebtConversion,
    DissolutionLiquidation,
    AssignmentCooptation,
    // Capital and finance
    CapitalIncrease,
    CapitalDecrease,
    InKindContribution,
    ShareAssignment,
    CreditFacility,
    Collateral,
    DividendDistribution,
    // Company structure
    MergerByAbsorption,
    Merger,
    Division,
    Dissolution,
    Liquidation,
    LegalFormChange,
    // Registered office and branches
    OfficeRelocation,
    BranchOpening,
    BranchClosing,
    // Administration
    MemberWithdrawal,
    MemberCooptation,
    AdministratorAppointment,
    AdministratorRemoval,
    MandateRenewal,
    RepresentativeChange,
    // Business purpose
    ActivityCodeUpdate,
    ActivityAddition,
    ActivityRemoval,
    PurposeChange,
    // Catch-all
    IdentificationUpdate,
    DurationChange,
    NameChange,
    // Generic resolution vocabulary
    GeneralMeetingResolution,
    MemberDecision,
    // Nothing matched
    Undetermined,
}

/// Kinds in classifier evaluation order. `Undetermined` is last.
pub const PRIORITY_ORDER: &[OperationKind] = &[
    OperationKind::CapitalIncreaseDebtConversion,
    OperationKind::DissolutionLiquidation,
    OperationKind::AssignmentCooptation,
    OperationKind::CapitalIncrease,
    OperationKind::CapitalDecrease,
    OperationKind::InKindContribution,
    OperationKind::ShareAssignment,
    OperationKind::CreditFacility,
    OperationKind::Collateral,
    OperationKind::DividendDistribution,
    OperationKind::MergerByAbsorption,
    OperationKind::Merger,
    OperationKind::Division,
    OperationKind::Dissolution,
    OperationKind::Liquidation,
    OperationKind::LegalFormChange,
    OperationKind::OfficeRelocation,
    OperationKind::BranchOpening,
    OperationKind::BranchClosing,
    OperationKind::MemberWithdrawal,
    OperationKind::MemberCooptation,
    OperationKind::AdministratorAppointment,
    OperationKind::AdministratorRemoval,
    OperationKind::MandateRenewal,
    OperationKind::RepresentativeChange,
    OperationKind::ActivityCodeUpdate,
    OperationKind::ActivityAddition,
    OperationKind::ActivityRemoval,
    OperationKind::PurposeChange,
    OperationKind::IdentificationUpdate,
    OperationKind::DurationChange,
    OperationKind::NameChange,
    OperationKind::GeneralMeetingResolution,
    OperationKind::MemberDecision,
    OperationKind::Undetermined,
];

/// Frequent but editorially uninteresting operations, left out of listings.
pub const NOISE_KINDS: &[OperationKind] = &[OperationKind::ActivityCodeUpdate];

/// Operations flagged as significant regardless of company size.
pub const HIGH_INTEREST_KINDS: &[OperationKind] = &[
    OperationKind::CapitalIncrease,
    OperationKind::CapitalIncreaseDebtConversion,
    OperationKind::CreditFacility,
    OperationKind::Collateral,
    OperationKind::MergerByAbsorption,
    OperationKind::Merger,
    OperationKind::Division,
    OperationKind::DividendDistribution,
    OperationKind::DissolutionLiquidation,
];

impl OperationKind {
    /// Stable snake_case identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::CapitalIncreaseDebtConversion => "majorare_capital_conversie_creanta",
            Self::DissolutionLiquidation => "dizolvare_lichidare",
            Self::AssignmentCooptation => "cesiune_cooptare",
            Self::CapitalIncrease => "majorare_capital",
            Self::CapitalDecrease => "reducere_capital",
            Self::InKindContribution => "aport_natura",
            Self::ShareAssignment => "cesiune_parti_sociale",
            Self::CreditFacility => "contractare_credit",
            Self::Collateral => "constituire_garantii",
            Self::DividendDistribution => "repartizare_dividende",
            Self::MergerByAbsorption => "fuziune_absorbtie",
            Self::Merger => "fuziune",
            Self::Division => "divizare",
            Self::Dissolution => "dizolvare",
            Self::Liquidation => "lichidare",
            Self::LegalFormChange => "transformare_forma",
            Self::OfficeRelocation => "schimbare_sediu",
            Self::BranchOpening => "deschidere_punct_lucru",
            Self::BranchClosing => "inchidere_punct_lucru",
            Self::MemberWithdrawal => "retragere_asociat",
            Self::MemberCooptation => "cooptare_asociat",
            Self::AdministratorAppointment => "numire_administrator",
            Self::AdministratorRemoval => "revocare_administrator",
            Self::MandateRenewal => "prelungire_mandat",
            Self::RepresentativeChange => "schimbare_reprezentant",
            Self::ActivityCodeUpdate => "actualizare_caen",
            Self::ActivityAddition => "completare_activitati",
            Self::ActivityRemoval => "radiere_activitati",
            Self::PurposeChange => "modificare_obiect_activitate",
            Self::IdentificationUpdate => "actualizare_date",
            Self::DurationChange => "modificare_durata",
            Self::NameChange => "schimbare_denumire",
            Self::GeneralMeetingResolution => "hotarare_aga",
            Self::MemberDecision => "decizie_asociat",
            Self::Undetermined => "nedeterminat",
        }
    }

    /// Human-readable name as printed in reports and alerts.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CapitalIncreaseDebtConversion => "Majorare capital prin conversie creanță",
            Self::DissolutionLiquidation => "Dizolvare și lichidare",
            Self::AssignmentCooptation => "Cesiune și cooptare asociat",
            Self::CapitalIncrease => "Majorare capital",
            Self::CapitalDecrease => "Reducere capital",
            Self::InKindContribution => "Aport în natură",
            Self::ShareAssignment => "Cesiune părți sociale",
            Self::CreditFacility => "Contractare credit",
            Self::Collateral => "Constituire garanții",
            Self::DividendDistribution => "Repartizare dividende",
            Self::MergerByAbsorption => "Fuziune prin absorbție",
            Self::Merger => "Fuziune",
            Self::Division => "Divizare",
            Self::Dissolution => "Dizolvare",
            Self::Liquidation => "Lichidare",
            Self::LegalFormChange => "Transformare formă juridică",
            Self::OfficeRelocation => "Schimbare sediu social",
            Self::BranchOpening => "Deschidere punct de lucru",
            Self::BranchClosing => "Închidere punct de lucru",
            Self::MemberWithdrawal => "Retragere asociat",
            Self::MemberCooptation => "Cooptare asociat",
            Self::AdministratorAppointment => "Numire administrator",
            Self::AdministratorRemoval => "Revocare administrator",
            Self::MandateRenewal => "Prelungire mandat",
            Self::RepresentativeChange => "Schimbare reprezentant",
            Self::ActivityCodeUpdate => "Actualizare CAEN Rev.3",
            Self::ActivityAddition => "Completare activități",
            Self::ActivityRemoval => "Radiere activități",
            Self::PurposeChange => "Modificare obiect activitate",
            Self::IdentificationUpdate => "Actualizare date identificare",
            Self::DurationChange => "Modificare durată societate",
            Self::NameChange => "Schimbare denumire",
            Self::GeneralMeetingResolution => "Hotărâre AGA",
            Self::MemberDecision => "Decizie asociat",
            Self::Undetermined => "Operațiune nedeterminată",
        }
    }

    /// Category the operation belongs to.
    pub fn category(self) -> Category {
        match self {
            Self::CapitalIncreaseDebtConversion
            | Self::AssignmentCooptation
            | Self::CapitalIncrease
            | Self::CapitalDecrease
            | Self::InKindContribution
            | Self::ShareAssignment
            | Self::CreditFacility
            | Self::Collateral
            | Self::DividendDistribution => Category::CapitalFinance,
            Self::DissolutionLiquidation
            | Self::MergerByAbsorption
            | Self::Merger
            | Self::Division
            | Self::Dissolution
            | Self::Liquidation
            | Self::LegalFormChange => Category::Structure,
            Self::OfficeRelocation | Self::BranchOpening | Self::BranchClosing => {
                Category::OfficeBranches
            }
            Self::MemberWithdrawal
            | Self::MemberCooptation
            | Self::AdministratorAppointment
            | Self::AdministratorRemoval
            | Self::MandateRenewal
            | Self::RepresentativeChange => Category::Administration,
            Self::ActivityCodeUpdate
            | Self::ActivityAddition
            | Self::ActivityRemoval
            | Self::PurposeChange => Category::BusinessPurpose,
            Self::IdentificationUpdate
            | Self::DurationChange
            | Self::NameChange
            | Self::GeneralMeetingResolution
            | Self::MemberDecision => Category::Other,
            Self::Undetermined => Category::Unclassified,
        }
    }

    /// Whether the kind is excluded from report listings.
    pub fn is_noise(self) -> bool {
        NOISE_KINDS.contains(&self)
    }

    /// Whether the kind is editorially flagged as significant.
    pub fn is_high_interest(self) -> bool {
        HIGH_INTEREST_KINDS.contains(&self)
    }

    /// Position in [`PRIORITY_ORDER`]; lower is evaluated earlier.
    pub fn priority(self) -> usize {
        PRIORITY_ORDER
            .iter()
            .position(|k| *k == self)
            .unwrap_or(PRIORITY_ORDER.len())
    }

    /// Every kind, in priority order.
    pub fn all() -> &'static [OperationKind] {
        PRIORITY_ORDER
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OperationKind {
    type Err = GazetteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PRIORITY_ORDER
            .iter()
            .copied()
            .find(|k| k.id() == s)
            .ok_or_else(|| GazetteError::validation(format!("unknown operation kind '{s}'")))
    }
}

impl Serialize for OperationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_and_high_interest_are_disjoint() {
        for kind in NOISE_KINDS {
            assert!(
                !HIGH_INTEREST_KINDS.contains(kind),
                "{kind} is both noise and high-interest"
            );
        }
        for kind in OperationKind::all() {
            assert!(!(kind.is_noise() && kind.is_high_interest()));
        }
    }

    #[test]
    fn every_kind_has_name_and_category() {
        for kind in OperationKind::all() {
            assert!(!kind.id().is_empty());
            assert!(!kind.display_name().is_empty());
            assert!(!kind.category().label().is_empty());
        }
    }

    #[test]
    fn priority_order_has_no_duplicates() {
        for (i, kind) in PRIORITY_ORDER.iter().enumerate() {
            assert_eq!(kind.priority(), i, "{kind} appears twice");
        }
        assert_eq!(PRIORITY_ORDER.last(), Some(&OperationKind::Undetermined));
    }

    #[test]
    fn ids_roundtrip_through_from_str() {
        for kind in OperationKind::all() {
            let parsed: OperationKind = kind.id().parse().expect("parse id");
            assert_eq!(parsed, *kind);
        }
        assert!("majorare".parse::<OperationKind>().is_err());
    }

    #[test]
    fn fallback_entry() {
        let kind = OperationKind::Undetermined;
        assert_eq!(kind.id(), "nedeterminat");
        assert_eq!(kind.display_name(), "Operațiune nedeterminată");
        assert_eq!(kind.category().label(), "Altele");
        assert!(!kind.is_noise());
        assert!(!kind.is_high_interest());
    }

    #[test]
    fn serializes_as_id() {
        let json = serde_json::to_string(&OperationKind::DissolutionLiquidation).unwrap();
        assert_eq!(json, "\"dizolvare_lichidare\"");
        let json = serde_json::to_string(&Category::CapitalFinance).unwrap();
        assert_eq!(json, "\"Capital și finanțare\"");
    }
}
