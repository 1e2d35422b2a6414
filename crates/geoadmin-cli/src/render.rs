//! Plain-text output for the console.

use geoadmin_core::{JoinedRow, Notice, NoticeLevel};

const HEADERS: [&str; 5] = ["City id", "Country", "Flag", "Department", "City"];

fn cells(row: &JoinedRow) -> [String; 5] {
    [
        row.city_id.map(|id| id.to_string()).unwrap_or_default(),
        row.country_name.clone(),
        row.country_flag.clone().unwrap_or_else(|| "-".into()),
        row.department_name.clone(),
        row.city_name.clone(),
    ]
}

/// Aligned table; widths count chars so accented names line up.
pub fn table(rows: &[JoinedRow]) -> String {
    let body: Vec<[String; 5]> = rows.iter().map(cells).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cols: &[String]| {
        cols.iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    out.push_str(&line(&HEADERS.map(String::from)));
    out.push('\n');
    out.push_str(&line(&widths.map(|w| "-".repeat(w))));
    out.push('\n');
    for row in &body {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("[ok] {}", notice.message),
        NoticeLevel::Info => println!("[info] {}", notice.message),
        NoticeLevel::Error => eprintln!("[error] {}", notice.message),
    }
}
