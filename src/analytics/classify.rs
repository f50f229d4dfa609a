//! Keyword classification of free-text role and program names.
//!
//! First-match substring search over ordered, hardcoded keyword tables.
//! Deterministic: the same string always lands in the same bucket, and
//! anything unmatched falls to `Other`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Department {
    Administration,
    Finance,
    CustomerSupport,
    Operations,
    It,
    Other,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Administration => "Administration",
            Department::Finance => "Finance",
            Department::CustomerSupport => "Customer Support",
            Department::Operations => "Operations",
            Department::It => "IT",
            Department::Other => "Other",
        }
    }

    pub const ALL: [Department; 6] = [
        Department::Administration,
        Department::Finance,
        Department::CustomerSupport,
        Department::Operations,
        Department::It,
        Department::Other,
    ];
}

// Order matters: earlier entries win, so "Data Entry Clerk" is Administration
// (via "clerk") before "data" can pull it into IT.
const DEPARTMENT_KEYWORDS: [(&str, Department); 22] = [
    ("admin", Department::Administration),
    ("secretar", Department::Administration),
    ("clerk", Department::Administration),
    ("recept", Department::Administration),
    ("typist", Department::Administration),
    ("financ", Department::Finance),
    ("account", Department::Finance),
    ("bookkeep", Department::Finance),
    ("audit", Department::Finance),
    ("teller", Department::Finance),
    ("payroll", Department::Finance),
    ("customer", Department::CustomerSupport),
    ("service", Department::CustomerSupport),
    ("support", Department::CustomerSupport),
    ("call center", Department::CustomerSupport),
    ("mail", Department::Operations),
    ("courier", Department::Operations),
    ("driver", Department::Operations),
    ("warehouse", Department::Operations),
    ("logistic", Department::Operations),
    ("operat", Department::Operations),
    ("assembl", Department::Operations),
];

const DEPARTMENT_IT_KEYWORDS: [&str; 6] =
    ["software", "develop", "engineer", "comput", "data", "tech"];

/// Department for an occupation name.
pub fn department(name: &str) -> Department {
    let lower = name.to_lowercase();
    for (needle, dept) in DEPARTMENT_KEYWORDS {
        if lower.contains(needle) {
            return dept;
        }
    }
    for needle in DEPARTMENT_IT_KEYWORDS {
        if lower.contains(needle) {
            return Department::It;
        }
    }
    Department::Other
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BudgetCategory {
    DigitalSkills,
    TechnicalTraining,
    Leadership,
    SoftSkills,
    Other,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetCategory::DigitalSkills => "Digital Skills",
            BudgetCategory::TechnicalTraining => "Technical Training",
            BudgetCategory::Leadership => "Leadership",
            BudgetCategory::SoftSkills => "Soft Skills",
            BudgetCategory::Other => "Other",
        }
    }

    pub const ALL: [BudgetCategory; 5] = [
        BudgetCategory::DigitalSkills,
        BudgetCategory::TechnicalTraining,
        BudgetCategory::Leadership,
        BudgetCategory::SoftSkills,
        BudgetCategory::Other,
    ];
}

const CATEGORY_KEYWORDS: [(&str, BudgetCategory); 18] = [
    ("digital", BudgetCategory::DigitalSkills),
    ("data", BudgetCategory::DigitalSkills),
    ("analyt", BudgetCategory::DigitalSkills),
    ("comput", BudgetCategory::DigitalSkills),
    ("cyber", BudgetCategory::TechnicalTraining),
    ("cloud", BudgetCategory::TechnicalTraining),
    ("program", BudgetCategory::TechnicalTraining),
    ("software", BudgetCategory::TechnicalTraining),
    ("engineer", BudgetCategory::TechnicalTraining),
    ("technical", BudgetCategory::TechnicalTraining),
    ("leader", BudgetCategory::Leadership),
    ("manage", BudgetCategory::Leadership),
    ("coach", BudgetCategory::Leadership),
    ("writ", BudgetCategory::SoftSkills),
    ("communic", BudgetCategory::SoftSkills),
    ("present", BudgetCategory::SoftSkills),
    ("customer", BudgetCategory::SoftSkills),
    ("negotiat", BudgetCategory::SoftSkills),
];

/// Budget category for a training-program name.
pub fn budget_category(program: &str) -> BudgetCategory {
    let lower = program.to_lowercase();
    for (needle, category) in CATEGORY_KEYWORDS {
        if lower.contains(needle) {
            return category;
        }
    }
    BudgetCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_first_match_wins() {
        // "clerk" outranks "data"
        assert_eq!(department("Data Entry Clerk"), Department::Administration);
        assert_eq!(department("Software Developer"), Department::It);
        assert_eq!(department("Bank Teller"), Department::Finance);
        assert_eq!(department("Customer Service Rep"), Department::CustomerSupport);
        assert_eq!(department("Mail Sorter"), Department::Operations);
    }

    #[test]
    fn test_unmatched_falls_to_other() {
        assert_eq!(department("Florist"), Department::Other);
        assert_eq!(budget_category("Beekeeping 101"), BudgetCategory::Other);
    }

    #[test]
    fn test_classifier_is_pure() {
        for name in ["Accounting Clerk", "zzz", "Advanced Data Analytics", ""] {
            assert_eq!(department(name), department(name));
            assert_eq!(budget_category(name), budget_category(name));
        }
    }

    #[test]
    fn test_budget_categories() {
        assert_eq!(budget_category("Digital Skills Fundamentals"), BudgetCategory::DigitalSkills);
        assert_eq!(budget_category("Cybersecurity Basics"), BudgetCategory::TechnicalTraining);
        assert_eq!(budget_category("Leadership Development"), BudgetCategory::Leadership);
        assert_eq!(budget_category("Technical Writing"), BudgetCategory::TechnicalTraining);
        assert_eq!(budget_category("Agile Project Management"), BudgetCategory::Leadership);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(department("ACCOUNTING CLERK"), department("accounting clerk"));
    }
}
