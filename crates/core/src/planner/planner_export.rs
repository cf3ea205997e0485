use chrono::NaiveDate;

use super::planner_model::StudyPlan;

/// Plain-text schedule for saving to a file. `None` without a schedule.
pub fn export_schedule(plan: &StudyPlan) -> Option<String> {
    let schedule = plan.schedule.as_ref()?;

    let exam_date = plan
        .exam_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let mut text = String::from("My Study Schedule\n");
    text.push_str(&format!("Exam Date: {}\n", exam_date));
    text.push_str(&format!("Subjects: {}\n", plan.subjects.join(", ")));
    text.push_str(&format!("Hours per day: {}\n\n", plan.hours_per_day));
    text.push_str("--- Schedule ---\n\n");

    for entry in schedule {
        let status = if plan.is_complete(&entry.id) { "[x]" } else { "[ ]" };
        text.push_str(&format!(
            "{} {} ({}) - {} ({}h)\n",
            status, entry.date, entry.day, entry.subject, entry.hours
        ));
    }
    Some(text)
}

/// Short summary for sharing through a messenger.
pub fn share_summary(plan: &StudyPlan, today: NaiveDate) -> Option<String> {
    plan.schedule.as_ref()?;
    Some(format!(
        "My Study Plan\n\nExam in {} days\nSubjects: {}\n{} hours/day\nProgress: {}%\n",
        plan.days_until_exam(today),
        plan.subjects.join(", "),
        plan.hours_per_day,
        plan.progress_percent()
    ))
}
