use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::nav::{
    AddExerciseView, AddSetsView, CalendarView, DayDetailView, Dialogs, Event,
    NavigationController, Screen, ScreenKind, WorkoutDetailView, YearMonth,
};

use super::forms::{ExercisePicker, PickerFocus, SetField, SetForm, WorkoutNameForm};
use super::helpers::{centered_rect, key_hints};
use super::screens::{DayCursor, ListCursor};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 2;
/// Width of one calendar cell: two digits, an activity marker, a gap.
const CELL_WIDTH: usize = 4;

/// Shell-side input state for the active screen. It only holds what the user
/// is typing or pointing at; the data itself lives in the controller's screen.
enum Input {
    Calendar(DayCursor),
    DayDetail(ListCursor),
    WorkoutForm(WorkoutNameForm),
    WorkoutDetail(ListCursor),
    AddExercise(ExercisePicker),
    AddSets(SetForm),
}

impl Input {
    /// `came_from` is the day the user was looking at before this screen, if
    /// any. The calendar cursor lands on it when it falls in the shown month.
    fn fresh(screen: &Screen, today: NaiveDate, came_from: Option<NaiveDate>) -> Self {
        match screen {
            Screen::Calendar(view) => {
                let day = match came_from {
                    Some(date) if YearMonth::of(date) == view.month => date.day(),
                    _ if view.month == YearMonth::of(today) => today.day(),
                    _ => 1,
                };
                Input::Calendar(DayCursor::new(day, view.month))
            }
            Screen::DayDetail(_) => Input::DayDetail(ListCursor::default()),
            Screen::WorkoutForm(_) => Input::WorkoutForm(WorkoutNameForm::default()),
            Screen::WorkoutDetail(_) => Input::WorkoutDetail(ListCursor::default()),
            Screen::AddExercise(view) => {
                Input::AddExercise(ExercisePicker::new(view.catalog.len()))
            }
            Screen::AddSets(_) => Input::AddSets(SetForm::default()),
        }
    }
}

/// What a key press resolved to.
enum KeyAction {
    None,
    Quit,
    Status(String),
    Dispatch(Event),
}

/// Identity of the data a screen shows. Input state is rebuilt whenever it
/// changes.
fn anchor(screen: &Screen) -> (ScreenKind, i64) {
    let key = match screen {
        Screen::Calendar(view) => i64::from(view.month.year) * 12 + i64::from(view.month.month),
        Screen::DayDetail(view) => i64::from(view.date.num_days_from_ce()),
        Screen::WorkoutForm(view) => i64::from(view.date.num_days_from_ce()),
        Screen::WorkoutDetail(view) => view.workout.id,
        Screen::AddExercise(view) => view.workout.id,
        Screen::AddSets(view) => view.workout_exercise_id,
    };
    (screen.kind(), key)
}

fn viewed_day(screen: &Screen) -> Option<NaiveDate> {
    match screen {
        Screen::DayDetail(view) => Some(view.date),
        _ => None,
    }
}

fn logged_count(screen: &Screen) -> usize {
    match screen {
        Screen::AddSets(view) => view.logged.len(),
        _ => 0,
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state: the controller plus per-screen input.
pub struct App {
    controller: NavigationController,
    input: Input,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(controller: NavigationController) -> Self {
        let input = Input::fresh(controller.screen(), controller.today(), None);
        Self {
            controller,
            input,
            status: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        self.controller.screen()
    }

    /// Translate a key into an event and run it. Returns `true` when the user
    /// asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, dialogs: &mut dyn Dialogs) -> bool {
        self.clear_status();
        let event = match self.key_action(code) {
            KeyAction::None => return false,
            KeyAction::Quit => return true,
            KeyAction::Status(text) => {
                self.set_status(text, StatusKind::Error);
                return false;
            }
            KeyAction::Dispatch(event) => event,
        };

        let before = anchor(self.controller.screen());
        let logged_before = logged_count(self.controller.screen());
        let came_from = viewed_day(self.controller.screen());
        let saving_workout = matches!(event, Event::SaveWorkout { .. });
        let deleting_workout = matches!(event, Event::DeleteWorkout);

        self.controller.handle(event, dialogs);

        let after = anchor(self.controller.screen());
        if after != before {
            self.input = Input::fresh(
                self.controller.screen(),
                self.controller.today(),
                came_from,
            );
            if saving_workout {
                self.set_status("Workout saved.", StatusKind::Info);
            } else if deleting_workout {
                self.set_status("Workout deleted.", StatusKind::Info);
            }
        } else {
            self.refresh_input(logged_before);
        }
        false
    }

    /// Surface messages reported through `Dialogs::notify_error`.
    pub fn show_errors(&mut self, errors: Vec<String>) {
        if let Some(last) = errors.into_iter().last() {
            self.set_status(last, StatusKind::Error);
        }
    }

    fn refresh_input(&mut self, logged_before: usize) {
        match (self.controller.screen(), &mut self.input) {
            (Screen::DayDetail(view), Input::DayDetail(cursor)) => {
                cursor.ensure_in_bounds(view.workouts.len())
            }
            (Screen::WorkoutDetail(view), Input::WorkoutDetail(cursor)) => {
                cursor.ensure_in_bounds(view.exercises.len())
            }
            (Screen::AddSets(view), Input::AddSets(form)) => {
                if view.logged.len() > logged_before {
                    form.clear_reps();
                    self.status = Some(StatusMessage {
                        text: format!("Logged set {}.", view.logged.len()),
                        kind: StatusKind::Info,
                    });
                }
            }
            _ => {}
        }
    }

    fn key_action(&mut self, code: KeyCode) -> KeyAction {
        match (self.controller.screen(), &mut self.input) {
            (Screen::Calendar(view), Input::Calendar(cursor)) => {
                calendar_key(code, view, cursor)
            }
            (Screen::DayDetail(view), Input::DayDetail(cursor)) => {
                day_detail_key(code, view, cursor)
            }
            (Screen::WorkoutForm(_), Input::WorkoutForm(form)) => match code {
                KeyCode::Esc => KeyAction::Dispatch(Event::Cancel),
                KeyCode::Enter => KeyAction::Dispatch(Event::SaveWorkout {
                    name: form.name.clone(),
                }),
                KeyCode::Backspace => {
                    form.backspace();
                    KeyAction::None
                }
                KeyCode::Char(ch) => {
                    form.push_char(ch);
                    KeyAction::None
                }
                _ => KeyAction::None,
            },
            (Screen::WorkoutDetail(view), Input::WorkoutDetail(cursor)) => {
                workout_detail_key(code, view, cursor)
            }
            (Screen::AddExercise(view), Input::AddExercise(picker)) => {
                add_exercise_key(code, view, picker)
            }
            (Screen::AddSets(_), Input::AddSets(form)) => match code {
                KeyCode::Esc => KeyAction::Dispatch(Event::Done),
                KeyCode::Tab | KeyCode::BackTab => {
                    form.toggle_field();
                    KeyAction::None
                }
                KeyCode::Backspace => {
                    form.backspace();
                    KeyAction::None
                }
                KeyCode::Enter => {
                    let (reps, weight) = form.parse_inputs();
                    KeyAction::Dispatch(Event::AddSet { reps, weight })
                }
                KeyCode::Char(ch) => {
                    form.push_char(ch);
                    KeyAction::None
                }
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let screen = self.controller.screen();
        let header = Paragraph::new(Line::from(Span::styled(
            screen.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, chunks[0]);

        match (screen, &self.input) {
            (Screen::Calendar(view), Input::Calendar(cursor)) => {
                self.draw_calendar(frame, chunks[1], view, cursor)
            }
            (Screen::DayDetail(view), Input::DayDetail(cursor)) => {
                self.draw_day_detail(frame, chunks[1], view, cursor)
            }
            (Screen::WorkoutForm(_), Input::WorkoutForm(form)) => {
                self.draw_workout_form(frame, area, form)
            }
            (Screen::WorkoutDetail(view), Input::WorkoutDetail(cursor)) => {
                self.draw_workout_detail(frame, chunks[1], view, cursor)
            }
            (Screen::AddExercise(view), Input::AddExercise(picker)) => {
                self.draw_add_exercise(frame, chunks[1], view, picker)
            }
            (Screen::AddSets(view), Input::AddSets(form)) => {
                self.draw_add_sets(frame, chunks[1], view, form)
            }
            _ => {}
        }

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_calendar(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &CalendarView,
        cursor: &DayCursor,
    ) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "{:<width$}{}",
                "Wk",
                ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
                    .iter()
                    .map(|name| format!("{name:<CELL_WIDTH$}"))
                    .collect::<String>(),
                width = CELL_WIDTH
            ),
            dim,
        ))];

        for week in &view.grid.weeks {
            let mut spans = vec![Span::styled(
                format!("{:<CELL_WIDTH$}", week.iso_week),
                dim,
            )];
            for slot in &week.days {
                match slot {
                    Some(cell) => {
                        let marker = if cell.has_activity { '*' } else { ' ' };
                        let mut style = if cell.has_activity {
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        if cell.day == cursor.day {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        spans.push(Span::styled(format!("{:>2}{marker}", cell.day), style));
                        spans.push(Span::raw(" "));
                    }
                    None => spans.push(Span::raw(" ".repeat(CELL_WIDTH))),
                }
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("* workout logged", dim)));

        let calendar = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(calendar, area);
    }

    fn draw_day_detail(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &DayDetailView,
        cursor: &ListCursor,
    ) {
        if view.workouts.is_empty() {
            let message = Paragraph::new("No workouts on this day. Press 'a' to add one.")
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = view
            .workouts
            .iter()
            .enumerate()
            .map(|(idx, workout)| ListItem::new(format!("{}. {}", idx + 1, workout.name)))
            .collect();
        self.render_list(frame, area, "Workouts", items, Some(cursor.selected));
    }

    fn draw_workout_form(&self, frame: &mut Frame, area: Rect, form: &WorkoutNameForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("New Workout").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Name: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_workout_detail(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &WorkoutDetailView,
        cursor: &ListCursor,
    ) {
        if view.exercises.is_empty() {
            let message = Paragraph::new("No exercises yet. Press 'a' to add one.")
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = view
            .exercises
            .iter()
            .map(|entry| ListItem::new(entry.summary()))
            .collect();
        self.render_list(frame, area, "Exercises", items, Some(cursor.selected));
    }

    fn draw_add_exercise(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &AddExerciseView,
        picker: &ExercisePicker,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let block = Block::default().borders(Borders::ALL);
        let input = Paragraph::new(picker.build_line()).block(block.clone());
        frame.render_widget(input, chunks[0]);

        if picker.focus == PickerFocus::NewName {
            let inner = block.inner(chunks[0]);
            let prefix = "New exercise: ".len() as u16;
            let typed = picker.new_name.chars().count() as u16;
            frame.set_cursor_position((inner.x + prefix + typed, inner.y));
        }

        if view.catalog.is_empty() {
            let message = Paragraph::new("The catalog is empty. Type a name to create one.")
                .alignment(Alignment::Center);
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = view
            .catalog
            .iter()
            .map(|exercise| ListItem::new(exercise.name.clone()))
            .collect();
        let selected = (picker.focus == PickerFocus::Catalog).then_some(picker.selected);
        self.render_list(frame, chunks[1], "Catalog", items, selected);
    }

    fn draw_add_sets(&self, frame: &mut Frame, area: Rect, view: &AddSetsView, form: &SetForm) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let block = Block::default().title("New Set").borders(Borders::ALL);
        let lines = vec![
            form.build_line(SetField::Reps),
            form.build_line(SetField::Weight),
        ];
        frame.render_widget(Paragraph::new(lines).block(block.clone()), chunks[0]);

        let inner = block.inner(chunks[0]);
        let (prefix, row) = match form.active {
            SetField::Reps => ("Reps: ".len() as u16, 0),
            SetField::Weight => ("Weight: ".len() as u16, 1),
        };
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + row,
        ));

        let items: Vec<ListItem> = view
            .logged
            .iter()
            .enumerate()
            .map(|(idx, set)| ListItem::new(format!("Set {}: {}", idx + 1, set.display_label())))
            .collect();
        self.render_list(frame, chunks[1], "Logged this session", items, None);
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem>,
        selected: Option<usize>,
    ) {
        let list = List::new(items)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match self.controller.screen().kind() {
            ScreenKind::Calendar => key_hints(&[
                ("←→↑↓", "Day"),
                ("[ ]", "Month"),
                ("t", "Today"),
                ("Enter", "Open Day"),
                ("q", "Quit"),
            ]),
            ScreenKind::DayDetail => key_hints(&[
                ("↑↓", "Select"),
                ("←→", "Prev/Next Day"),
                ("Enter", "Open"),
                ("a", "Add Workout"),
                ("Esc", "Calendar"),
            ]),
            ScreenKind::WorkoutForm => key_hints(&[("Enter", "Save"), ("Esc", "Cancel")]),
            ScreenKind::WorkoutDetail => key_hints(&[
                ("↑↓", "Select"),
                ("a", "Add Exercise"),
                ("x", "Remove Exercise"),
                ("d", "Delete Workout"),
                ("Esc", "Back"),
            ]),
            ScreenKind::AddExercise => key_hints(&[
                ("↑↓", "Pick"),
                ("Type", "New Name"),
                ("Tab", "Switch"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ]),
            ScreenKind::AddSets => key_hints(&[
                ("Tab", "Switch Field"),
                ("Enter", "Add Set"),
                ("Esc", "Done"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn calendar_key(code: KeyCode, view: &CalendarView, cursor: &mut DayCursor) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Left => cursor.shift(-1, view.month),
        KeyCode::Right => cursor.shift(1, view.month),
        KeyCode::Up => cursor.shift(-7, view.month),
        KeyCode::Down => cursor.shift(7, view.month),
        KeyCode::PageUp | KeyCode::Char('[') | KeyCode::Char('<') => {
            return KeyAction::Dispatch(Event::PrevMonth)
        }
        KeyCode::PageDown | KeyCode::Char(']') | KeyCode::Char('>') => {
            return KeyAction::Dispatch(Event::NextMonth)
        }
        KeyCode::Char('t') | KeyCode::Char('T') => return KeyAction::Dispatch(Event::Today),
        KeyCode::Enter => return KeyAction::Dispatch(Event::SelectDay(cursor.day)),
        _ => {}
    }
    KeyAction::None
}

fn day_detail_key(code: KeyCode, view: &DayDetailView, cursor: &mut ListCursor) -> KeyAction {
    let len = view.workouts.len();
    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Esc | KeyCode::Backspace => return KeyAction::Dispatch(Event::Back),
        KeyCode::Up => cursor.move_selection(-1, len),
        KeyCode::Down => cursor.move_selection(1, len),
        KeyCode::Home => cursor.select_first(),
        KeyCode::End => cursor.select_last(len),
        KeyCode::Left | KeyCode::Char('h') => return KeyAction::Dispatch(Event::PrevDay),
        KeyCode::Right | KeyCode::Char('l') => return KeyAction::Dispatch(Event::NextDay),
        KeyCode::Char('a') | KeyCode::Char('+') => {
            return KeyAction::Dispatch(Event::AddWorkout)
        }
        KeyCode::Enter => {
            return match view.workouts.get(cursor.selected) {
                Some(workout) => KeyAction::Dispatch(Event::OpenWorkout(workout.clone())),
                None => KeyAction::Status("No workout selected.".to_string()),
            }
        }
        _ => {}
    }
    KeyAction::None
}

fn workout_detail_key(
    code: KeyCode,
    view: &WorkoutDetailView,
    cursor: &mut ListCursor,
) -> KeyAction {
    let len = view.exercises.len();
    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Esc | KeyCode::Backspace => return KeyAction::Dispatch(Event::Back),
        KeyCode::Up => cursor.move_selection(-1, len),
        KeyCode::Down => cursor.move_selection(1, len),
        KeyCode::Home => cursor.select_first(),
        KeyCode::End => cursor.select_last(len),
        KeyCode::Char('a') | KeyCode::Char('+') => {
            return KeyAction::Dispatch(Event::AddExercise)
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            return KeyAction::Dispatch(Event::DeleteWorkout)
        }
        KeyCode::Char('x') | KeyCode::Char('-') => {
            return match view.exercises.get(cursor.selected) {
                Some(entry) => KeyAction::Dispatch(Event::DeleteExercise {
                    workout_exercise_id: entry.workout_exercise_id,
                }),
                None => KeyAction::Status("No exercise selected to remove.".to_string()),
            }
        }
        _ => {}
    }
    KeyAction::None
}

fn add_exercise_key(
    code: KeyCode,
    view: &AddExerciseView,
    picker: &mut ExercisePicker,
) -> KeyAction {
    let len = view.catalog.len();
    match code {
        KeyCode::Esc => return KeyAction::Dispatch(Event::Cancel),
        KeyCode::Tab | KeyCode::BackTab => picker.toggle_focus(),
        KeyCode::Up => picker.move_selection(-1, len),
        KeyCode::Down => picker.move_selection(1, len),
        KeyCode::Backspace => picker.backspace(),
        KeyCode::Enter => {
            return KeyAction::Dispatch(Event::SaveExercise {
                name: picker.chosen_name(&view.catalog),
            })
        }
        KeyCode::Char(ch) => {
            picker.push_char(ch);
        }
        _ => {}
    }
    KeyAction::None
}
