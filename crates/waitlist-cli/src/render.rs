//! Terminal tables.

use chrono::NaiveDate;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use waitlist_core::store::{HistoryEntry, NameMatch};
use waitlist_core::table::{format_date, format_timestamp};
use waitlist_core::{Collection, Role, UrgencyTier, WaitlistRow};

pub fn print_rows(collection: Collection, rows: &[WaitlistRow<'_>]) {
    println!("{} ({})", collection.sheet_name(), rows.len());
    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    let mut header = vec![
        header_cell("#"),
        header_cell("Nome"),
        header_cell("Especialidade"),
        header_cell("Primeiro contato"),
        header_cell("Dias"),
        header_cell("Turno"),
        header_cell("Telefone"),
    ];
    if collection == Collection::Served {
        header.extend([
            header_cell("Profissional"),
            header_cell("Horário"),
            header_cell("Início"),
        ]);
    }
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for (index, row) in rows.iter().enumerate() {
        let record = row.record;
        let mut cells = vec![
            Cell::new(index + 1),
            Cell::new(&record.name),
            Cell::new(record.specialty.label()),
            Cell::new(format_date(record.first_contact_date())),
            days_cell(row.days_waited, row.tier),
            Cell::new(record.preferred_time_slot.label()),
            Cell::new(&record.phone),
        ];
        if let Some(grant) = record.grant() {
            cells.extend([
                Cell::new(&grant.assigned_professional),
                Cell::new(&grant.assigned_time_slot),
                Cell::new(format_date(grant.treatment_start_date)),
            ]);
        }
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn print_matches(matches: &[NameMatch<'_>], as_of: NaiveDate) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Nome"),
        header_cell("Lista"),
        header_cell("Especialidade"),
        header_cell("Dias"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for found in matches {
        let days = found.record.days_waited(as_of);
        table.add_row(vec![
            Cell::new(&found.record.name),
            Cell::new(found.collection.sheet_name()),
            Cell::new(found.record.specialty.label()),
            days_cell(days, waitlist_core::urgency_tier(days)),
            Cell::new(format!("{:.2}", found.score)),
        ]);
    }
    println!("{table}");
}

pub fn print_history(entries: &[HistoryEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Nome"),
        header_cell("Especialidade"),
        header_cell("Registrado por"),
        header_cell("Data/Hora"),
        header_cell("Vaga"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);

    for entry in entries {
        let slot = if entry.slot_granted {
            Cell::new("Sim").fg(Color::Green)
        } else {
            dim_cell("Não")
        };
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.specialty.label()),
            Cell::new(&entry.registered_by),
            Cell::new(format_timestamp(entry.registered_at)),
            slot,
        ]);
    }
    println!("{table}");
}

pub fn print_users<'a>(users: impl Iterator<Item = (&'a str, Role)>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Usuário"), header_cell("Perfil")]);
    apply_table_style(&mut table);
    for (username, role) in users {
        let role_cell = match role {
            Role::Administrator => Cell::new(role.label()).add_attribute(Attribute::Bold),
            Role::Standard => Cell::new(role.label()),
        };
        table.add_row(vec![Cell::new(username), role_cell]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}

fn days_cell(days: i64, tier: UrgencyTier) -> Cell {
    Cell::new(days).fg(tier_color(tier))
}

fn tier_color(tier: UrgencyTier) -> Color {
    match tier {
        UrgencyTier::Low => Color::Green,
        UrgencyTier::Medium => Color::Yellow,
        UrgencyTier::High => Color::Red,
    }
}
