// Terminal front end for the customer-success dashboard.
//
// Loads the sheet and boundaries once, then renders KPIs and the chart
// tables for one selection (or, with `--interactive`, for as many months as
// the user picks) and optionally exports them for a chart renderer.
use clap::Parser;
use cs_dashboard::output::{self, export_view};
use cs_dashboard::util::{format_int, format_number};
use cs_dashboard::{Dashboard, DashboardConfig, DashboardError, FilterSelection};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cs_dashboard", about = "Customer success sales dashboard")]
struct Args {
    /// TOML file with title, input paths and chart theme
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sales sheet exported as CSV (overrides the config file)
    #[arg(long)]
    data: Option<PathBuf>,
    /// State boundaries as GeoJSON (overrides the config file)
    #[arg(long)]
    geo: Option<PathBuf>,
    /// Read at most this many rows of the sheet
    #[arg(long)]
    max_rows: Option<usize>,
    /// Month to show, e.g. `2023-9` (defaults to the most recent)
    #[arg(long)]
    month: Option<String>,
    /// State to include; repeat for several (defaults to all)
    #[arg(long = "state")]
    states: Vec<String>,
    /// Customer to include; repeat for several (defaults to all)
    #[arg(long = "customer")]
    customers: Vec<String>,
    /// Write the tables, a JSON summary and the boundaries here
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Rows to print per table
    #[arg(long, default_value_t = 10)]
    rows: usize,
    /// Pick months from a menu after loading
    #[arg(long)]
    interactive: bool,
}

impl Args {
    fn to_config(&self) -> Result<DashboardConfig, DashboardError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_path(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(geo) = &self.geo {
            config.geo_path = geo.clone();
        }
        if self.max_rows.is_some() {
            config.max_rows = self.max_rows;
        }
        Ok(config)
    }

    fn selection(&self, dash: &Dashboard, month: Option<String>) -> Option<FilterSelection> {
        let month = month.or_else(|| dash.months().into_iter().next())?;
        let states = if self.states.is_empty() {
            dash.states()
        } else {
            self.states.clone()
        };
        let customers = if self.customers.is_empty() {
            dash.customers()
        } else {
            self.customers.clone()
        };
        Some(FilterSelection::new(month, states, customers))
    }
}

/// Read one trimmed line after the "Enter choice:" prompt. `None` once the
/// input is exhausted or unreadable.
fn read_choice<R: BufRead>(input: &mut R) -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    read_trimmed_line(input)
}

fn read_trimmed_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`; `false` for `N` or end of input.
fn prompt_back_to_menu<R: BufRead>(input: &mut R) -> bool {
    loop {
        print!("Back to Month Selection (Y/N): ");
        let _ = io::stdout().flush();
        let Some(resp) = read_trimmed_line(input) else {
            println!();
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Keep asking until a listed month is picked. `None` at end of input.
fn pick_month<'a, R: BufRead>(input: &mut R, months: &'a [String]) -> Option<&'a String> {
    if months.is_empty() {
        return None;
    }
    loop {
        println!("Select Month:");
        for (idx, month) in months.iter().enumerate() {
            println!("[{}] {}", idx + 1, month);
        }
        println!();
        let choice = read_choice(input)?;
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| months.get(i));
        match picked {
            Some(month) => return Some(month),
            None => println!("Invalid choice. Please enter 1 to {}.\n", months.len()),
        }
    }
}

/// Print one selection. An empty selection is reported and rendering stops
/// there; any other error is passed up.
fn render(
    dash: &Dashboard,
    config: &DashboardConfig,
    selection: &FilterSelection,
    args: &Args,
) -> Result<(), DashboardError> {
    let view = match dash.view(selection) {
        Ok(view) => view,
        Err(e) if e.is_recoverable() => {
            println!("Warning: {e}!\n");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("{} ({})\n", config.title, selection.month);

    let kpis = &view.kpis;
    println!("Revenue:                       US $ {}", format_int(kpis.total_revenue.trunc() as i64));
    println!("Average Revenue:               US $ {}", format_number(kpis.average_revenue, 2));
    match kpis.average_satisfaction {
        Some(avg) => println!(
            "Customer Satisfaction Rating:  {avg} {}",
            "⭐".repeat(kpis.stars as usize)
        ),
        None => println!("Customer Satisfaction Rating:  n/a"),
    }
    println!();

    output::preview_table("Revenue by Day", &view.revenue_by_day, args.rows);
    output::preview_table("Units Sold by Product", &view.units_by_product, args.rows);
    output::preview_table("Revenue by State", &view.revenue_by_region, args.rows);
    output::preview_table(
        "Revenue by Customer Acquisition Type",
        &view.revenue_by_acquisition_type,
        args.rows,
    );

    if let Some(dir) = &args.out_dir {
        let written = export_view(dir, &view, config, dash.geo())?;
        println!("(Exported {} files to {})\n", written.len(), dir.display());
    }
    Ok(())
}

fn run_interactive<R: BufRead>(
    input: &mut R,
    dash: &Dashboard,
    config: &DashboardConfig,
    args: &Args,
) -> Result<(), DashboardError> {
    let months = dash.months();
    loop {
        let Some(month) = pick_month(input, &months) else {
            println!("\nExiting the program.");
            return Ok(());
        };
        println!();
        if let Some(selection) = args.selection(dash, Some(month.clone())) {
            render(dash, config, &selection, args)?;
        }
        if !prompt_back_to_menu(input) {
            println!("Exiting the program.");
            return Ok(());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args = Args::parse();
    let config = args.to_config()?;

    let dash = Dashboard::init(&config)?;
    if let Some(report) = dash.load_report() {
        println!(
            "Processing dataset... ({} rows read, {} records loaded)",
            format_int(report.total_rows),
            format_int(report.loaded_rows)
        );
    }
    println!(
        "{} months, {} states, {} customers\n",
        dash.months().len(),
        dash.states().len(),
        dash.customers().len()
    );

    if args.interactive {
        run_interactive(&mut io::stdin().lock(), &dash, &config, &args)?;
        return Ok(());
    }

    match args.selection(&dash, args.month.clone()) {
        Some(selection) => render(&dash, &config, &selection, &args)?,
        None => println!("Warning: the sheet has no records to show!"),
    }
    Ok(())
}
