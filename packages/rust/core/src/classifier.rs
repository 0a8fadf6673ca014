//! Ordered rule-based operation classifier.
//!
//! A notice is lower-cased, cedillas are folded to comma-below, and the rules
//! are evaluated top to bottom. Each [`PatternRule`] has a gate (every keyword
//! group must hit) and a list of outcomes (the first whose groups all hit
//! decides the kind). A rule whose gate opens but has no matching outcome falls
//! through to the next rule. Nothing matched yields
//! [`OperationKind::Undetermined`].

use gazette_shared::OperationKind;
use tracing::debug;

/// Alternatives; the group hits when any keyword is a substring of the text.
type Keywords = &'static [&'static str];

/// A candidate verdict inside a rule.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    when: &'static [Keywords],
    kind: OperationKind,
}

impl Outcome {
    /// Outcome taken whenever the rule's gate opens.
    const fn always(kind: OperationKind) -> Self {
        Self { when: &[], kind }
    }

    const fn when(when: &'static [Keywords], kind: OperationKind) -> Self {
        Self { when, kind }
    }
}

/// One named keyword rule.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub label: &'static str,
    requires: &'static [Keywords],
    outcomes: &'static [Outcome],
}

impl PatternRule {
    /// Evaluate against a normalized haystack (see [`normalize_text`]).
    pub fn apply(&self, haystack: &str) -> Option<OperationKind> {
        if !all_groups_hit(haystack, self.requires) {
            return None;
        }
        self.outcomes
            .iter()
            .find(|o| all_groups_hit(haystack, o.when))
            .map(|o| o.kind)
    }

    /// Every kind this rule can produce, in outcome order.
    pub fn kinds(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.outcomes.iter().map(|o| o.kind)
    }
}

fn all_groups_hit(haystack: &str, groups: &[Keywords]) -> bool {
    groups
        .iter()
        .all(|group| group.iter().any(|kw| haystack.contains(kw)))
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

const CAPITAL: Keywords = &["capital"];
const ADMINISTRATOR: Keywords = &["administrator"];
const APPOINT: Keywords = &["numir", "numit", "desemn"];
const REPLACE: Keywords = &["revocar", "înlocui", "inlocui"];
const DECISION: Keywords = &["decizie", "hotărâre", "hotarare"];

/// Default rules, most specific first.
pub static DEFAULT_RULES: &[PatternRule] = &[
    // Combined operations
    PatternRule {
        label: "capital-debt-conversion",
        requires: &[
            CAPITAL,
            &["conversie", "capitalizare"],
            &["creanț", "creant", "împrumut", "imprumut"],
        ],
        outcomes: &[Outcome::always(OperationKind::CapitalIncreaseDebtConversion)],
    },
    PatternRule {
        label: "dissolution-liquidation",
        requires: &[],
        outcomes: &[
            Outcome::when(&[&["fără lichidator"]], OperationKind::DissolutionLiquidation),
            Outcome::when(&[&["dizolv"], &["lichid"]], OperationKind::DissolutionLiquidation),
        ],
    },
    PatternRule {
        label: "assignment-cooptation",
        requires: &[&["cesiune"], &["cooptar"]],
        outcomes: &[Outcome::always(OperationKind::AssignmentCooptation)],
    },
    // Capital and financing
    PatternRule {
        label: "capital-increase",
        requires: &[CAPITAL, &["majorar", "mărir", "marir"]],
        outcomes: &[Outcome::always(OperationKind::CapitalIncrease)],
    },
    PatternRule {
        label: "capital-decrease",
        requires: &[CAPITAL, &["reducere", "diminuar"]],
        outcomes: &[Outcome::always(OperationKind::CapitalDecrease)],
    },
    PatternRule {
        label: "in-kind-contribution",
        requires: &[&["aport"], &["natur", "teren", "imobil"]],
        outcomes: &[Outcome::always(OperationKind::InKindContribution)],
    },
    PatternRule {
        label: "share-assignment",
        requires: &[
            &["cesiune", "cesiona", "cedent"],
            &["părți", "parti", "sociale", "100%"],
        ],
        outcomes: &[Outcome::always(OperationKind::ShareAssignment)],
    },
    PatternRule {
        label: "credit-facility",
        requires: &[&["credit"], &["contract", "obține", "obtine"]],
        outcomes: &[Outcome::always(OperationKind::CreditFacility)],
    },
    PatternRule {
        label: "collateral",
        requires: &[&["garanți", "garanti", "ipotec", "gaj"]],
        outcomes: &[Outcome::always(OperationKind::Collateral)],
    },
    PatternRule {
        label: "dividends",
        requires: &[],
        outcomes: &[
            Outcome::when(&[&["dividend"]], OperationKind::DividendDistribution),
            Outcome::when(&[&["repartiz"], &["profit"]], OperationKind::DividendDistribution),
        ],
    },
    // Company structure
    PatternRule {
        label: "merger-by-absorption",
        requires: &[&["fuziune"], &["absorbți", "absorbt"]],
        outcomes: &[Outcome::always(OperationKind::MergerByAbsorption)],
    },
    PatternRule {
        label: "merger",
        requires: &[&["fuziune"]],
        outcomes: &[Outcome::always(OperationKind::Merger)],
    },
    PatternRule {
        label: "division",
        requires: &[&["diviza"]],
        outcomes: &[Outcome::always(OperationKind::Division)],
    },
    PatternRule {
        label: "dissolution",
        requires: &[&["dizolv"]],
        outcomes: &[Outcome::always(OperationKind::Dissolution)],
    },
    PatternRule {
        label: "liquidation",
        requires: &[&["lichid"]],
        outcomes: &[Outcome::always(OperationKind::Liquidation)],
    },
    PatternRule {
        label: "legal-form-change",
        requires: &[&["transform"], &["formă", "forma", "juridic"]],
        outcomes: &[Outcome::always(OperationKind::LegalFormChange)],
    },
    // Registered office and branches
    PatternRule {
        label: "office-relocation",
        requires: &[
            &["sediu"],
            &["schimbar", "mutar", "muta", "transfer", "nou sediu", "noul sediu"],
        ],
        outcomes: &[Outcome::always(OperationKind::OfficeRelocation)],
    },
    PatternRule {
        label: "branch",
        requires: &[&["punct"], &["lucru"]],
        outcomes: &[
            Outcome::when(
                &[&["deschid", "înființ", "infiint", "înregistr"]],
                OperationKind::BranchOpening,
            ),
            Outcome::when(
                &[&["închid", "inchid", "radier", "desființ"]],
                OperationKind::BranchClosing,
            ),
        ],
    },
    // Administration
    PatternRule {
        label: "member-withdrawal",
        requires: &[&["retragere", "retras"], &["asociat", "societate"]],
        outcomes: &[Outcome::always(OperationKind::MemberWithdrawal)],
    },
    PatternRule {
        label: "member-cooptation",
        requires: &[&["cooptar"]],
        outcomes: &[Outcome::always(OperationKind::MemberCooptation)],
    },
    PatternRule {
        label: "administrator",
        requires: &[ADMINISTRATOR],
        outcomes: &[
            Outcome::when(&[APPOINT, REPLACE], OperationKind::AdministratorRemoval),
            Outcome::when(&[APPOINT], OperationKind::AdministratorAppointment),
            Outcome::when(
                &[&["revocar", "încetar", "incetar", "demisie"]],
                OperationKind::AdministratorRemoval,
            ),
            Outcome::when(
                &[&["prelungir", "reînnoi", "reinnoi"]],
                OperationKind::MandateRenewal,
            ),
        ],
    },
    PatternRule {
        label: "representative-change",
        requires: &[&["reprezentant"], &["schimbar", "înlocui"]],
        outcomes: &[Outcome::always(OperationKind::RepresentativeChange)],
    },
    // Business purpose
    PatternRule {
        label: "activity-code-update",
        requires: &[&["caen"], &["rev", "actuali", "recodific", "declar"]],
        outcomes: &[Outcome::always(OperationKind::ActivityCodeUpdate)],
    },
    PatternRule {
        label: "activities",
        requires: &[&["activit"]],
        outcomes: &[
            Outcome::when(
                &[&["completar", "adăugar", "adaug", "extind"]],
                OperationKind::ActivityAddition,
            ),
            Outcome::when(
                &[&["radier", "elimina", "renunț", "renunt"]],
                OperationKind::ActivityRemoval,
            ),
        ],
    },
    PatternRule {
        label: "purpose-change",
        requires: &[&["obiect"], &["activitate"]],
        outcomes: &[Outcome::always(OperationKind::PurposeChange)],
    },
    // Catch-all amendments
    PatternRule {
        label: "identification-update",
        requires: &[&["actuali"], &["date", "identificare", "c.i."]],
        outcomes: &[Outcome::always(OperationKind::IdentificationUpdate)],
    },
    PatternRule {
        label: "duration-change",
        requires: &[&["durată", "durata"], &["nedeterminat", "modificar"]],
        outcomes: &[Outcome::always(OperationKind::DurationChange)],
    },
    PatternRule {
        label: "name-change",
        requires: &[&["denumir"], &["schimbar", "noua"]],
        outcomes: &[Outcome::always(OperationKind::NameChange)],
    },
    // Resolution vocabulary
    PatternRule {
        label: "general-meeting",
        requires: &[&["adunării generale", "adunarea generală", "a.g.a"]],
        outcomes: &[Outcome::always(OperationKind::GeneralMeetingResolution)],
    },
    PatternRule {
        label: "decision",
        requires: &[DECISION],
        outcomes: &[
            Outcome::when(&[&["asociat"]], OperationKind::MemberDecision),
            Outcome::always(OperationKind::GeneralMeetingResolution),
        ],
    },
];

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// An ordered list of rules. The first rule producing a kind wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl RuleSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Classify a notice. Total: unmatched text is [`OperationKind::Undetermined`].
    pub fn classify(&self, text: &str) -> OperationKind {
        self.explain(text).0
    }

    /// Classify and report which rule fired, if any.
    pub fn explain(&self, text: &str) -> (OperationKind, Option<&'static str>) {
        let haystack = normalize_text(text);

        for rule in &self.rules {
            if let Some(kind) = rule.apply(&haystack) {
                debug!(rule = rule.label, kind = %kind, "rule matched");
                return (kind, Some(rule.label));
            }
        }

        (OperationKind::Undetermined, None)
    }
}

/// Lower-case and fold cedilla `ş`/`ţ` to comma-below `ș`/`ț`.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'ş' => 'ș',
            'ţ' => 'ț',
            other => other,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
