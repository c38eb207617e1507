use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
};

use super::app::MonitorApp;
use super::board::Board;
use super::widgets::{bar_gauge, render_dial, render_sparkline};
use crate::core::telemetry::{
    format_bytes, GaugeId, ProcessEntry, Series, TextField, View, NOT_AVAILABLE,
};

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &MonitorApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active view
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_tabs(frame, chunks[0], app);
    match app.visible_view() {
        View::Dashboard => render_dashboard(frame, chunks[1], app),
        View::CpuCores => render_cpu_cores(frame, chunks[1], app),
        View::Processes => render_processes(frame, chunks[1], &app.board),
        View::Gpu => render_gpu(frame, chunks[1], app),
        View::SystemInfo => render_system_info(frame, chunks[1], app),
    }
    render_footer(frame, chunks[2]);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let titles = View::ALL.iter().map(|view| view.title());
    let tabs = Tabs::new(titles)
        .block(Block::default().title(" Vitals ").borders(Borders::ALL))
        .select(app.selected_tab)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Dials
            Constraint::Percentage(35), // Sparklines
            Constraint::Min(3),         // Details
        ])
        .split(area);

    let dials = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    for (slot, (gauge, title)) in [
        (GaugeId::Cpu, "CPU"),
        (GaugeId::Memory, "Memory"),
        (GaugeId::Disk, "Disk"),
        (GaugeId::Battery, "Battery"),
    ]
    .into_iter()
    .enumerate()
    {
        let (label, geometry) = match app.board.gauge(gauge) {
            Some(view) => (view.label.as_str(), view.geometry),
            None => ("-", None),
        };
        render_dial(frame, dials[slot], title, label, geometry, &app.gauge_layout);
    }

    let sparklines = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);
    for (slot, (series, title, color)) in [
        (Series::Cpu, "CPU History", Color::Cyan),
        (Series::Memory, "Memory History", Color::Magenta),
        (Series::Download, "Download", Color::Green),
    ]
    .into_iter()
    .enumerate()
    {
        render_sparkline(
            frame,
            sparklines[slot],
            title,
            app.board.sparkline(series),
            app.sparkline_size,
            color,
        );
    }

    let field = |field: TextField| app.board.text(field).unwrap_or("-").to_string();
    let details = vec![
        Line::from(vec![
            "↓ ".green(),
            Span::raw(field(TextField::Download)),
            Span::raw("   "),
            "↑ ".red(),
            Span::raw(field(TextField::Upload)),
            Span::raw("   Temp: "),
            Span::raw(field(TextField::Temperature)),
            Span::raw("   Processes: "),
            Span::raw(field(TextField::ProcessCount)),
        ]),
        Line::from(vec![
            Span::raw("Memory: "),
            Span::raw(field(TextField::MemorySplit)),
            Span::raw("   Battery: "),
            Span::raw(field(TextField::BatteryTime)),
        ]),
    ];
    let paragraph =
        Paragraph::new(details).block(Block::default().title(" Details ").borders(Borders::ALL));
    frame.render_widget(paragraph, rows[2]);
}

fn render_cpu_cores(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let block = Block::default()
        .title(format!(" CPU Cores ({}) ", app.board.core_count()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cores = app.board.core_count();
    if cores == 0 || inner.height == 0 {
        return;
    }

    // two columns once the cores no longer fit one
    let per_column = inner.height as usize;
    let columns = if cores > per_column { 2 } else { 1 };
    let column_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(inner);

    for core in 0..cores.min(per_column * columns) {
        let column = column_areas[core / per_column];
        let row = Rect {
            y: column.y + (core % per_column) as u16,
            height: 1,
            ..column
        };
        let Some(view) = app.board.gauge(GaugeId::Core(core)) else {
            continue;
        };
        let label = format!("Core {:>2}: {}", core, view.label);
        frame.render_widget(bar_gauge(&app.gauge_layout, view.geometry, &label), row);
    }
}

fn render_processes(frame: &mut Frame, area: Rect, board: &Board) {
    let Some(top) = board.processes() else {
        let paragraph = Paragraph::new("Waiting for process list...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Processes ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = |ranking: &str, shown: usize| {
        format!(
            " Top {} by {} ({} total, gen {}) ",
            shown, ranking, top.total, top.generation
        )
    };
    frame.render_widget(
        process_table(&top.by_cpu, title("CPU", top.by_cpu.len())),
        columns[0],
    );
    frame.render_widget(
        process_table(&top.by_memory, title("Memory", top.by_memory.len())),
        columns[1],
    );
}

fn process_table(entries: &[ProcessEntry], title: String) -> Table<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("PID").style(bold),
        Cell::from("Name").style(bold),
        Cell::from("CPU %").style(bold),
        Cell::from("Memory").style(bold),
    ])
    .height(1);

    let rows: Vec<Row> = entries
        .iter()
        .map(|process| {
            Row::new(vec![
                Cell::from(process.pid.to_string()),
                Cell::from(process.name.clone()),
                Cell::from(format!("{:.1}%", process.cpu_percent)),
                Cell::from(format_bytes(process.memory_bytes)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(45),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
}

fn render_gpu(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let gpus: Vec<u32> = app.board.gpu_ids().collect();
    let status = app.board.text(TextField::GpuStatus).unwrap_or("Detecting GPUs...");

    if gpus.is_empty() {
        let paragraph = Paragraph::new(status)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" GPU ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, gpus.len() as u32); gpus.len()])
        .split(area);

    for (slot, id) in gpus.into_iter().enumerate() {
        let parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(rows[slot]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(parts[1]);

        let (label, geometry) = match app.board.gauge(GaugeId::Gpu(id)) {
            Some(view) => (view.label.as_str(), view.geometry),
            None => ("-", None),
        };
        render_dial(
            frame,
            parts[0],
            &format!("GPU {}", id),
            label,
            geometry,
            &app.gauge_layout,
        );

        let detail = app.board.text(TextField::GpuDetail(id)).unwrap_or(NOT_AVAILABLE);
        frame.render_widget(
            Paragraph::new(detail).block(Block::default().borders(Borders::ALL)),
            right[0],
        );
        render_sparkline(
            frame,
            right[1],
            "Load History",
            app.board.sparkline(Series::GpuLoad(id)),
            app.sparkline_size,
            Color::Yellow,
        );
    }
}

fn render_system_info(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let field = |field: TextField| app.board.text(field).unwrap_or("-").to_string();
    let row = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("{:<12}", name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };

    let lines = vec![
        row("Hostname", app.host.hostname.clone()),
        row("OS", app.host.os.clone()),
        row("Kernel", app.host.kernel.clone()),
        row("Arch", app.host.arch.to_string()),
        row("Uptime", field(TextField::Uptime)),
        row("Memory", field(TextField::MemoryTotal)),
        row("Disk", field(TextField::DiskTotal)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" System Info ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ ?: Help │ Tab/←/→: Switch view │ 1-5: Jump to view ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    Vitals - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    Tab / →     Next view
    Shift+Tab/← Previous view
    1-5         Jump to a view

    Only the foreground view is redrawn;
    history keeps filling in the background.
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
