use chrono::Utc;
use db::models::task::Task;
use db::types::{TaskPriority, TaskStatus};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

const CSV_HEADER: [&str; 6] = [
    "title",
    "description",
    "status",
    "priority",
    "createdAt",
    "updatedAt",
];

/// Flat CSV rendition of the owned task set, newest first as passed in.
pub fn tasks_to_csv(tasks: &[Task]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for task in tasks {
        writer.write_record([
            task.title.as_str(),
            task.description.as_deref().unwrap_or(""),
            task.status.to_string().as_str(),
            task.priority.to_string().as_str(),
            task.created_at.to_rfc3339().as_str(),
            task.updated_at.to_rfc3339().as_str(),
        ])?;
    }
    Ok(writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    export_date: String,
    total_tasks: usize,
    tasks: &'a [Task],
}

pub fn tasks_to_json(tasks: &[Task]) -> Result<Vec<u8>, ExportError> {
    let export = JsonExport {
        export_date: Utc::now().to_rfc3339(),
        total_tasks: tasks.len(),
        tasks,
    };
    Ok(serde_json::to_vec_pretty(&export)?)
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const BOTTOM_GUARD_MM: f32 = 25.0;

/// Cursor over a growing document. Starts a fresh page whenever the next
/// line would run into the bottom margin.
struct PdfCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PdfCursor<'a> {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let advance = size * 0.5;
        if self.y - advance < BOTTOM_GUARD_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= advance;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

pub fn tasks_to_pdf(tasks: &[Task]) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        "TaskFlow - My Tasks",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;

    let mut cursor = PdfCursor {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    cursor.line("TaskFlow - My Tasks", 24.0, &bold);
    cursor.line(
        &format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        10.0,
        &regular,
    );
    cursor.gap(6.0);

    let counts = StatusBreakdown::tally(tasks);
    cursor.line("Summary", 14.0, &bold);
    cursor.line(&format!("Total Tasks: {}", tasks.len()), 10.0, &regular);
    cursor.line(&format!("Pending: {}", counts.pending), 10.0, &regular);
    cursor.line(&format!("In Progress: {}", counts.in_progress), 10.0, &regular);
    cursor.line(&format!("Completed: {}", counts.completed), 10.0, &regular);
    cursor.gap(6.0);

    cursor.line("Tasks", 14.0, &bold);
    cursor.gap(2.0);
    for (index, task) in tasks.iter().enumerate() {
        cursor.line(&format!("{}. {}", index + 1, task.title), 12.0, &bold);
        if let Some(description) = &task.description {
            cursor.line(&format!("Description: {description}"), 10.0, &regular);
        }
        cursor.line(
            &format!("Status: {}", task.status.to_string().to_uppercase()),
            10.0,
            &regular,
        );
        cursor.line(
            &format!("Priority: {}", task.priority.to_string().to_uppercase()),
            10.0,
            &regular,
        );
        cursor.line(
            &format!("Created: {}", task.created_at.format("%Y-%m-%d")),
            10.0,
            &regular,
        );
        cursor.gap(3.0);
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusBreakdown {
    fn tally(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityBreakdown {
    fn tally(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.priority {
                TaskPriority::Low => counts.low += 1,
                TaskPriority::Medium => counts.medium += 1,
                TaskPriority::High => counts.high += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTask {
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub total_tasks: usize,
    pub by_status: StatusBreakdown,
    pub by_priority: PriorityBreakdown,
    /// Percentage formatted to two decimals, or the number 0 for an empty
    /// task set. Consumers rely on that shape.
    pub completion_rate: serde_json::Value,
    pub recent_tasks: Vec<RecentTask>,
}

pub fn build_report(tasks: &[Task]) -> TaskReport {
    let by_status = StatusBreakdown::tally(tasks);
    let completion_rate = if tasks.is_empty() {
        json!(0)
    } else {
        let rate = by_status.completed as f64 / tasks.len() as f64 * 100.0;
        json!(format!("{rate:.2}"))
    };

    TaskReport {
        total_tasks: tasks.len(),
        by_priority: PriorityBreakdown::tally(tasks),
        completion_rate,
        recent_tasks: tasks
            .iter()
            .take(5)
            .map(|task| RecentTask {
                title: task.title.clone(),
                status: task.status.clone(),
                priority: task.priority.clone(),
                created_at: task.created_at,
            })
            .collect(),
        by_status,
    }
}
