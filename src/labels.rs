// Display strings, one catalog per language.
//
// Composers never hard-code user-facing text: every label goes through the
// catalog selected by `ReportParams::language`.
use crate::classify::Band;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    English,
    Polish,
}

impl Language {
    /// Parse a language tag such as `en`, `en-GB`, `pl` or `polski`.
    pub fn from_tag(tag: &str) -> Option<Language> {
        let tag = tag.trim().to_ascii_lowercase();
        let primary = tag.split(['-', '_']).next().unwrap_or("");
        match primary {
            "en" | "eng" | "english" => Some(Language::English),
            "pl" | "pol" | "polish" | "polski" => Some(Language::Polish),
            _ => None,
        }
    }

    pub fn catalog(self) -> &'static Catalog {
        match self {
            Language::English => &ENGLISH,
            Language::Polish => &POLISH,
        }
    }
}

pub struct Catalog {
    // shared
    pub not_applicable: &'static str,
    pub not_specified: &'static str,
    pub not_finished: &'static str,
    pub none: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub days: &'static str,
    pub hours: &'static str,
    pub tasks: &'static str,
    pub period: &'static str,
    pub period_to: &'static str,
    pub generated: &'static str,
    pub rank: &'static str,
    pub count: &'static str,
    pub percent: &'static str,
    pub status: &'static str,
    pub priority: &'static str,
    pub band: &'static str,
    pub band_good: &'static str,
    pub band_fair: &'static str,
    pub band_poor: &'static str,
    pub no_tasks_notice: &'static str,
    pub completion_rate: &'static str,
    pub delayed_tasks: &'static str,
    pub tasks_by_status: &'static str,
    pub tasks_by_priority: &'static str,

    // construction progress
    pub construction_title: &'static str,
    pub completed_tasks: &'static str,
    pub status_legend: &'static str,
    pub progress_heading: &'static str,
    pub progress_label: &'static str,
    pub task: &'static str,
    pub planned_end: &'static str,
    pub actual_end: &'static str,
    pub delay_days: &'static str,
    pub completion_pct: &'static str,
    pub task_register: &'static str,
    pub delayed_analysis: &'static str,
    pub average_delay: &'static str,

    // employee load
    pub employee_title: &'static str,
    pub employee: &'static str,
    pub employee_id: &'static str,
    pub task_count: &'static str,
    pub total_hours: &'static str,
    pub fte: &'static str,
    pub total: &'static str,
    pub workload_heading: &'static str,
    pub employee_legend: &'static str,
    pub workload_chart: &'static str,
    pub workload_ranking: &'static str,
    pub hours_per_task: &'static str,
    pub task_details: &'static str,
    pub task_id: &'static str,
    pub start: &'static str,
    pub deadline: &'static str,
    pub completed: &'static str,
    pub estimated_hours: &'static str,
    pub delayed: &'static str,

    // team efficiency
    pub team_title: &'static str,
    pub team: &'static str,
    pub teams_with_tasks: &'static str,
    pub total_tasks: &'static str,
    pub total_completed: &'static str,
    pub overall_completion: &'static str,
    pub team_summary: &'static str,
    pub on_time: &'static str,
    pub avg_delay_days: &'static str,
    pub members: &'static str,
    pub tasks_per_member: &'static str,
    pub team_legend: &'static str,
    pub efficiency_chart: &'static str,
    pub efficiency_ranking: &'static str,
    pub efficiency_score: &'static str,
    pub on_time_rate: &'static str,
    pub team_analysis: &'static str,
}

impl Catalog {
    pub fn band(&self, band: Band) -> &'static str {
        match band {
            Band::Good => self.band_good,
            Band::Fair => self.band_fair,
            Band::Poor => self.band_poor,
            Band::NotApplicable => self.not_applicable,
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        if value {
            self.yes
        } else {
            self.no
        }
    }
}

pub static ENGLISH: Catalog = Catalog {
    not_applicable: "N/A",
    not_specified: "Not specified",
    not_finished: "Not finished",
    none: "-",
    yes: "Yes",
    no: "No",
    days: "days",
    hours: "hours",
    tasks: "tasks",
    period: "Period: ",
    period_to: " to ",
    generated: "Report generated: ",
    rank: "Rank",
    count: "Number of tasks",
    percent: "Percent",
    status: "Status",
    priority: "Priority",
    band: "Band",
    band_good: "Good",
    band_fair: "Fair",
    band_poor: "Poor",
    no_tasks_notice: "No tasks assigned in this period.",
    completion_rate: "Completion rate",
    delayed_tasks: "Delayed tasks",
    tasks_by_status: "Tasks by status",
    tasks_by_priority: "Tasks by priority",

    construction_title: "Construction Progress Report",
    completed_tasks: "Completed tasks",
    status_legend: "Status colours: green = completed, blue = in progress, \
                    red = delayed, orange = started.",
    progress_heading: "Progress visualization",
    progress_label: "Task completion progress",
    task: "Task",
    planned_end: "Planned end",
    actual_end: "Actual end",
    delay_days: "Delay (days)",
    completion_pct: "Completion %",
    task_register: "Tasks",
    delayed_analysis: "Delayed task analysis",
    average_delay: "Average delay",

    employee_title: "Employee Load Report",
    employee: "Employee",
    employee_id: "Employee ID",
    task_count: "Number of tasks",
    total_hours: "Total hours",
    fte: "FTE",
    total: "Total",
    workload_heading: "Workload",
    employee_legend: "The workload chart shows each employee's hours relative to the \
                      heaviest load. Bands follow the task completion rate: 75% and \
                      above is good, 50% to 75% is fair, below 50% is poor.",
    workload_chart: "Workload comparison",
    workload_ranking: "Workload ranking",
    hours_per_task: "Hours per task",
    task_details: "Task details",
    task_id: "ID",
    start: "Start",
    deadline: "Deadline",
    completed: "Completed",
    estimated_hours: "Est. hours",
    delayed: "Delayed",

    team_title: "Team Efficiency Report",
    team: "Team",
    teams_with_tasks: "Teams with tasks",
    total_tasks: "Total tasks",
    total_completed: "Completed tasks",
    overall_completion: "Overall completion rate",
    team_summary: "Team summary",
    on_time: "On time",
    avg_delay_days: "Avg. delay (days)",
    members: "Active members",
    tasks_per_member: "Tasks per member",
    team_legend: "Efficiency score combines completion and timeliness on a 0-100 \
                  scale: 75 and above is good, 50 to 75 is fair, below 50 is poor. \
                  Teams without tasks are listed as N/A and left out of the chart.",
    efficiency_chart: "Efficiency comparison",
    efficiency_ranking: "Efficiency ranking",
    efficiency_score: "Efficiency score",
    on_time_rate: "On-time rate",
    team_analysis: "Team performance analysis",
};

pub static POLISH: Catalog = Catalog {
    not_applicable: "N/D",
    not_specified: "Nie określono",
    not_finished: "Nie zakończono",
    none: "-",
    yes: "Tak",
    no: "Nie",
    days: "dni",
    hours: "godzin",
    tasks: "zadań",
    period: "Okres: ",
    period_to: " do ",
    generated: "Raport wygenerowany: ",
    rank: "Miejsce",
    count: "Liczba zadań",
    percent: "Procent",
    status: "Status",
    priority: "Priorytet",
    band: "Ocena",
    band_good: "Dobra",
    band_fair: "Średnia",
    band_poor: "Słaba",
    no_tasks_notice: "Brak przypisanych zadań w tym okresie.",
    completion_rate: "Wskaźnik ukończenia",
    delayed_tasks: "Opóźnione zadania",
    tasks_by_status: "Zadania według statusu",
    tasks_by_priority: "Zadania według priorytetu",

    construction_title: "Raport postępu budowy",
    completed_tasks: "Ukończone zadania",
    status_legend: "Kolory statusów: zielony = zakończone, niebieski = w toku, \
                    czerwony = opóźnione, pomarańczowy = rozpoczęte.",
    progress_heading: "Wizualizacja postępu",
    progress_label: "Postęp ukończenia zadań",
    task: "Zadanie",
    planned_end: "Planowany koniec",
    actual_end: "Faktyczny koniec",
    delay_days: "Opóźnienie (dni)",
    completion_pct: "Ukończenie %",
    task_register: "Zadania",
    delayed_analysis: "Analiza opóźnionych zadań",
    average_delay: "Średnie opóźnienie",

    employee_title: "Raport obciążenia pracowników",
    employee: "Pracownik",
    employee_id: "ID pracownika",
    task_count: "Liczba zadań",
    total_hours: "Suma godzin",
    fte: "Etat",
    total: "Razem",
    workload_heading: "Obciążenie",
    employee_legend: "Wykres pokazuje godziny każdego pracownika względem \
                      najbardziej obciążonej osoby. Ocena wynika ze wskaźnika \
                      ukończenia zadań: od 75% dobra, od 50% średnia, poniżej 50% słaba.",
    workload_chart: "Porównanie obciążenia",
    workload_ranking: "Ranking obciążenia",
    hours_per_task: "Godzin na zadanie",
    task_details: "Szczegóły zadań",
    task_id: "ID",
    start: "Początek",
    deadline: "Termin",
    completed: "Zakończone",
    estimated_hours: "Szac. godziny",
    delayed: "Opóźnione",

    team_title: "Raport efektywności zespołów",
    team: "Zespół",
    teams_with_tasks: "Zespoły z zadaniami",
    total_tasks: "Wszystkie zadania",
    total_completed: "Ukończone zadania",
    overall_completion: "Ogólny wskaźnik ukończenia",
    team_summary: "Podsumowanie zespołów",
    on_time: "Na czas",
    avg_delay_days: "Śr. opóźnienie (dni)",
    members: "Aktywni członkowie",
    tasks_per_member: "Zadań na osobę",
    team_legend: "Wskaźnik efektywności łączy ukończenie i terminowość w skali 0-100: \
                  od 75 dobra, od 50 średnia, poniżej 50 słaba. Zespoły bez zadań \
                  oznaczono jako N/D i pominięto na wykresie.",
    efficiency_chart: "Porównanie efektywności",
    efficiency_ranking: "Ranking efektywności",
    efficiency_score: "Wskaźnik efektywności",
    on_time_rate: "Wskaźnik terminowości",
    team_analysis: "Analiza wydajności zespołów",
};
