//! Demo fixtures: entities, partnerships, and provisioned members
//!
//! The demo deployment ships with two partnered institutions and their
//! rosters already provisioned (all inactive, no phones bound), matching
//! the walkthrough data the front-end expects.

use shared::models::{
    Entity, EntityStatus, EntityType, Gender, Member, MemberStatus, Partnership,
};
use shared::util::member_row_id;

/// Standard subscription price, whole currency units
pub const BASE_PRICE: i64 = 4500;

pub fn entities() -> Vec<Entity> {
    vec![
        Entity {
            id: "ENT-001".into(),
            name: "Delhi Public School, R.K. Puram".into(),
            entity_type: EntityType::School,
            code: "DPS-RKP-01".into(),
            admin_name: "Dr. Anita Karwal".into(),
            admin_email: "principal@dpsrkp.edu.in".into(),
            status: EntityStatus::Active,
        },
        Entity {
            id: "ENT-002".into(),
            name: "IBM India Pvt Ltd".into(),
            entity_type: EntityType::Corporate,
            code: "IBM-IND-BLR".into(),
            admin_name: "Priya Rao".into(),
            admin_email: "hr.wellbeing@ibm.com".into(),
            status: EntityStatus::Active,
        },
    ]
}

/// Every seeded entity carries a flat 25% partnership
pub fn partnerships() -> Vec<Partnership> {
    entities()
        .into_iter()
        .map(|e| Partnership {
            institution_name: e.name,
            discount_percentage: 25,
            contract_end_date: "2026-12-31".into(),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn member(
    identifier: &str,
    first: &str,
    last: &str,
    email: &str,
    gender: Gender,
    dept: &str,
    desig: &str,
    institution: &str,
) -> Member {
    Member {
        id: member_row_id(),
        identifier: identifier.into(),
        first_name: first.into(),
        last_name: last.into(),
        email: email.into(),
        gender,
        department_grade: Some(dept.into()),
        designation_section: Some(desig.into()),
        phone: None,
        status: MemberStatus::Inactive,
        institution_id: institution.into(),
    }
}

pub fn members() -> Vec<Member> {
    use Gender::{Female, Male};
    vec![
        // Corporate employees (ENT-002)
        member("TC-2024-001", "Arjun", "Reddy", "arjun.reddy@techcorp.com", Male, "Engineering", "Senior Developer", "ENT-002"),
        member("TC-2024-002", "Kavya", "Nair", "kavya.nair@techcorp.com", Female, "Marketing", "Marketing Manager", "ENT-002"),
        member("TC-2024-003", "Vikram", "Singh", "vikram.singh@techcorp.com", Male, "Sales", "Sales Director", "ENT-002"),
        member("TC-2024-004", "Ananya", "Gupta", "ananya.gupta@techcorp.com", Female, "HR", "HR Executive", "ENT-002"),
        member("TC-2024-005", "Rohan", "Mehta", "rohan.mehta@techcorp.com", Male, "Finance", "Financial Analyst", "ENT-002"),
        member("TC-2024-006", "Meera", "Iyer", "meera.iyer@techcorp.com", Female, "Operations", "Operations Manager", "ENT-002"),
        member("TC-2024-007", "Karthik", "Rao", "karthik.rao@techcorp.com", Male, "Engineering", "DevOps Lead", "ENT-002"),
        // School students (ENT-001)
        member("SCH2024-10A-001", "Aarav", "Sharma", "aarav.sharma@school.edu", Male, "Grade 10", "Section A", "ENT-001"),
        member("SCH2024-09B-002", "Diya", "Patel", "diya.patel@school.edu", Female, "Grade 9", "Section B", "ENT-001"),
        member("SCH2024-11A-003", "Ishaan", "Verma", "ishaan.verma@school.edu", Male, "Grade 11", "Section A", "ENT-001"),
        member("SCH2024-10C-004", "Ananya", "Kapoor", "ananya.kapoor@school.edu", Female, "Grade 10", "Section C", "ENT-001"),
        member("SCH2024-12A-005", "Vihaan", "Joshi", "vihaan.joshi@school.edu", Male, "Grade 12", "Section A", "ENT-001"),
        member("SCH2024-08A-006", "Saanvi", "Desai", "saanvi.desai@school.edu", Female, "Grade 8", "Section A", "ENT-001"),
        member("SCH2024-11B-007", "Reyansh", "Pillai", "reyansh.pillai@school.edu", Male, "Grade 11", "Section B", "ENT-001"),
    ]
}
