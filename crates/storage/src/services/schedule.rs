use chrono::NaiveDate;

use crate::dto::program::ProgramFilter;
use crate::models::Program;

pub fn matches_filter(program: &Program, filter: &ProgramFilter, today: NaiveDate) -> bool {
    (!filter.upcoming || program.air_date.date() >= today)
        && filter.genre.as_ref().is_none_or(|genre| &program.genre == genre)
        && filter.channel.as_ref().is_none_or(|channel| &program.channel == channel)
}

/// Orders programs for display: today's shows first, then by air date.
pub fn sort_for_display(programs: &mut [Program], today: NaiveDate) {
    programs.sort_by(|a, b| {
        let a_today = a.air_date.date() == today;
        let b_today = b.air_date.date() == today;
        b_today
            .cmp(&a_today)
            .then_with(|| a.air_date.cmp(&b.air_date))
    });
}

pub fn select_programs(programs: Vec<Program>, filter: &ProgramFilter, today: NaiveDate) -> Vec<Program> {
    let mut selected: Vec<Program> = programs
        .into_iter()
        .filter(|program| matches_filter(program, filter, today))
        .collect();
    sort_for_display(&mut selected, today);
    selected
}
