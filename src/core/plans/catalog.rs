use time::{Date, macros::date};

use super::{Catalog, Folder, Plan};

const ARCH: Option<&str> = Some("folder-1");
const ELEC: Option<&str> = Some("folder-2");
const MECH: Option<&str> = Some("folder-3");
const STRUCT: Option<&str> = Some("folder-4");

/// Sheet number, title, folder, version, version date, tags.
type Sheet = (
    &'static str,
    &'static str,
    Option<&'static str>,
    &'static str,
    Date,
    &'static [&'static str],
);

const APPROVED: &[&str] = &["Approved"];
const REVIEW: &[&str] = &["For Review"];
const REVISION: &[&str] = &["Revision"];

const SHEETS: [Sheet; 19] = [
    ("A1.0", "FLOOR PLAN - LEVEL 1", ARCH, "v3", date!(2026 - 01 - 22), APPROVED),
    ("A1.1", "FLOOR PLAN - LEVEL 2", ARCH, "v2", date!(2026 - 01 - 20), APPROVED),
    ("A2.0", "EXTERIOR ELEVATIONS", ARCH, "v2", date!(2026 - 01 - 18), APPROVED),
    ("A2.1", "EXTERIOR ELEVATIONS", ARCH, "v2", date!(2026 - 01 - 18), APPROVED),
    ("A3.0", "BUILDING SECTIONS", ARCH, "v1", date!(2025 - 12 - 01), &[]),
    ("A4.0", "ROOF PLAN", ARCH, "v1", date!(2025 - 12 - 05), REVIEW),
    ("E1.0", "ELECTRICAL SITE PLAN", ELEC, "v2", date!(2026 - 01 - 15), APPROVED),
    ("E1.1", "ELECTRICAL FLOOR PLAN", ELEC, "v3", date!(2026 - 01 - 25), REVISION),
    ("E1.2", "ELECTRICAL FLOOR PLAN", ELEC, "v2", date!(2026 - 01 - 10), APPROVED),
    ("E1.3", "SITE LIGHTING PLAN", ELEC, "v1", date!(2026 - 01 - 28), REVIEW),
    ("E2.0", "PANEL SCHEDULES", ELEC, "v1", date!(2025 - 12 - 10), REVIEW),
    ("M1.0", "HVAC FLOOR PLAN", MECH, "v2", date!(2026 - 01 - 12), APPROVED),
    ("M1.1", "HVAC FLOOR PLAN", MECH, "v2", date!(2026 - 01 - 12), APPROVED),
    ("M2.0", "MECHANICAL SCHEDULES", MECH, "v1", date!(2025 - 12 - 15), &[]),
    ("S1.0", "FOUNDATION PLAN", STRUCT, "v2", date!(2026 - 01 - 08), APPROVED),
    ("S2.0", "FRAMING PLAN", STRUCT, "v3", date!(2026 - 01 - 20), APPROVED),
    ("S2.1", "FRAMING PLAN", STRUCT, "v2", date!(2026 - 01 - 15), APPROVED),
    ("C1.0", "SITE PLAN", None, "v1", date!(2025 - 11 - 01), APPROVED),
    ("G1.0", "COVER SHEET & INDEX", None, "v4", date!(2026 - 01 - 26), REVISION),
];

fn folder(id: &str, name: &str, plan_count: usize) -> Folder {
    Folder {
        id: id.to_string(),
        name: name.to_string(),
        plan_count,
    }
}

fn plan(number: usize, sheet: &Sheet) -> Plan {
    let &(sheet_number, title, folder_id, version, version_date, tags) = sheet;
    Plan {
        id: format!("plan-{number}"),
        sheet_number: sheet_number.to_string(),
        title: title.to_string(),
        folder_id: folder_id.map(str::to_string),
        version: version.to_string(),
        version_date,
        thumbnail_url: None,
        file_url: format!("/mock/plans/{sheet_number}.pdf"),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

/// Mock drawing set shipped with the app until plans move to the database.
pub fn bundled() -> Catalog {
    let folders = vec![
        folder("folder-1", "Architectural", 6),
        folder("folder-2", "Electrical", 5),
        folder("folder-3", "Mechanical", 3),
        folder("folder-4", "Structural", 3),
    ];
    let plans = SHEETS
        .iter()
        .enumerate()
        .map(|(index, sheet)| plan(index + 1, sheet))
        .collect();

    Catalog { folders, plans }
}
