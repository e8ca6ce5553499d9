use paddock::{Catalog, ColumnView, Facet, FilterSession, Visibility};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

const MAX_ITEMS: usize = 8;

pub fn print_run(session: &FilterSession, catalog: &Catalog, searches: &[(Facet, String)], color: bool) {
    let palette = ansi::Palette::new(color);
    let title = format!("⚙  Filtering ({} mode)", session.mode().name());
    println!("\n{}", palette.bold(palette.paint(title, ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Settle ━━━", ansi::GRAY));
    print_settle(session, catalog, &palette);

    println!("\n{}", palette.paint("━━━ Columns ━━━", ansi::GRAY));
    for facet in session.mode().facets().iter_facets() {
        let query =
            searches.iter().rev().find(|(searched, _)| *searched == facet).map_or("", |(_, text)| text.as_str());
        if let Some(column) = session.column(facet, catalog, query) {
            print_column(session, &column, query, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Selection ━━━", ansi::GRAY));
    if session.selection().is_empty() {
        println!("{}", palette.dim("  Nothing selected"));
    } else {
        for value in session.selection().iter() {
            let name = catalog.name_of(value).unwrap_or("?");
            println!("  {} {}", palette.paint(value.to_string(), ansi::GREEN), palette.dim(name));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let report = session.last_report();
    println!(
        "  Settle: {}  │  Passes: {}",
        palette.paint(format!("{:?}", report.elapsed), ansi::GREEN),
        palette.paint(report.passes.len().to_string(), ansi::CYAN),
    );
    println!();
}

fn print_settle(session: &FilterSession, catalog: &Catalog, palette: &ansi::Palette) {
    for pass in &session.last_report().passes {
        println!(
            "  {} {}  {}",
            palette.paint(format!("Pass {}:", pass.pass), ansi::BLUE),
            if pass.pruned > 0 {
                palette.paint(format!("✗ {} deselected", pass.pruned), ansi::RED)
            } else {
                palette.paint("✓ stable", ansi::GREEN)
            },
            palette.dim(format!("{} constrained │ {:?}", pass.constrained_facets, pass.duration)),
        );
        for value in &pass.values {
            let name = catalog.name_of(value).unwrap_or("unknown");
            println!("    {} {}", palette.paint(value.to_string(), ansi::YELLOW), palette.dim(name));
        }
    }
}

fn print_column(session: &FilterSession, column: &ColumnView, query: &str, palette: &ansi::Palette) {
    let shown: Vec<_> = column.shown().collect();
    let constraint = match session.visibility().get(column.facet) {
        Some(Visibility::Unconstrained) | None => palette.dim("unconstrained"),
        Some(Visibility::Only(_)) => palette.paint("constrained", ansi::YELLOW),
    };
    let badge = column.count_label();

    println!(
        "  {} {}  {} {}{}",
        palette.bold(palette.paint(column.title, ansi::BLUE)),
        if badge.is_empty() { String::new() } else { palette.paint(format!("({badge})"), ansi::GREEN) },
        palette.dim(format!("{}/{} shown │", shown.len(), column.items.len())),
        constraint,
        if query.is_empty() { String::new() } else { palette.dim(format!(" │ search: {query:?}")) },
    );

    for item in shown.iter().take(MAX_ITEMS) {
        let mark = if item.checked { palette.paint("[x]", ansi::GREEN) } else { palette.dim("[ ]") };
        println!("    {} {} {}", mark, item.name, palette.dim(item.value.to_string()));
    }
    if shown.len() > MAX_ITEMS {
        println!("    {}", palette.dim(format!("... +{} more", shown.len() - MAX_ITEMS)));
    }
}
