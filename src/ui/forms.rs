use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Exercise;

/// Render a `Label: value` line, highlighting the focused field and showing a
/// placeholder for empty ones.
pub(crate) fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Name input for the "new workout" form.
#[derive(Default, Clone)]
pub(crate) struct WorkoutNameForm {
    pub(crate) name: String,
}

impl WorkoutNameForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Name", &self.name, "<required>", true)
    }

    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Which part of the exercise picker receives Enter.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum PickerFocus {
    #[default]
    Catalog,
    NewName,
}

/// Pick an existing exercise or type a new one.
#[derive(Default, Clone)]
pub(crate) struct ExercisePicker {
    pub(crate) new_name: String,
    pub(crate) selected: usize,
    pub(crate) focus: PickerFocus,
}

impl ExercisePicker {
    pub(crate) fn new(catalog_len: usize) -> Self {
        Self {
            focus: if catalog_len == 0 {
                PickerFocus::NewName
            } else {
                PickerFocus::Catalog
            },
            ..Self::default()
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PickerFocus::Catalog => PickerFocus::NewName,
            PickerFocus::NewName => PickerFocus::Catalog,
        };
    }

    pub(crate) fn move_selection(&mut self, offset: isize, catalog_len: usize) {
        if catalog_len == 0 {
            return;
        }
        let max = catalog_len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
        self.focus = PickerFocus::Catalog;
    }

    /// Typing always goes to the new-name field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.new_name.push(ch);
        self.focus = PickerFocus::NewName;
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.new_name.pop();
    }

    /// The name Enter should submit. An empty catalog selection falls back to
    /// whatever was typed, which may be blank.
    pub(crate) fn chosen_name(&self, catalog: &[Exercise]) -> String {
        match self.focus {
            PickerFocus::Catalog => catalog
                .get(self.selected)
                .map(|exercise| exercise.name.clone())
                .unwrap_or_else(|| self.new_name.clone()),
            PickerFocus::NewName => self.new_name.clone(),
        }
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line(
            "New exercise",
            &self.new_name,
            "<type a name>",
            self.focus == PickerFocus::NewName,
        )
    }
}

/// Fields of the set entry form.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum SetField {
    #[default]
    Reps,
    Weight,
}

#[derive(Default, Clone)]
pub(crate) struct SetForm {
    pub(crate) reps: String,
    pub(crate) weight: String,
    pub(crate) active: SetField,
}

impl SetForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            SetField::Reps => SetField::Weight,
            SetField::Weight => SetField::Reps,
        };
    }

    /// Accept digits and a sign everywhere, plus a decimal point for weight.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let allowed = ch.is_ascii_digit()
            || ch == '-'
            || (self.active == SetField::Weight && (ch == '.' || ch == ','));
        if !allowed {
            return false;
        }
        let ch = if ch == ',' { '.' } else { ch };
        match self.active {
            SetField::Reps => self.reps.push(ch),
            SetField::Weight => self.weight.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            SetField::Reps => {
                self.reps.pop();
            }
            SetField::Weight => {
                self.weight.pop();
            }
        }
    }

    /// Parse both fields. Blank or malformed input becomes `None`; range
    /// checks are left to the store.
    pub(crate) fn parse_inputs(&self) -> (Option<i64>, Option<f64>) {
        let reps = self.reps.trim().parse::<i64>().ok();
        let weight = self
            .weight
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite());
        (reps, weight)
    }

    /// Keep the weight so consecutive sets at the same load are quick to log.
    pub(crate) fn clear_reps(&mut self) {
        self.reps.clear();
        self.active = SetField::Reps;
    }

    pub(crate) fn build_line(&self, field: SetField) -> Line<'static> {
        match field {
            SetField::Reps => field_line("Reps", &self.reps, "<required>", self.active == field),
            SetField::Weight => {
                field_line("Weight", &self.weight, "<required>", self.active == field)
            }
        }
    }

    pub(crate) fn value_len(&self, field: SetField) -> usize {
        match field {
            SetField::Reps => self.reps.chars().count(),
            SetField::Weight => self.weight.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Exercise> {
        vec![
            Exercise {
                id: 1,
                name: "Bench Press".to_string(),
            },
            Exercise {
                id: 2,
                name: "Squat".to_string(),
            },
        ]
    }

    #[test]
    fn set_form_parses_numbers() {
        let mut form = SetForm::default();
        for ch in "10".chars() {
            assert!(form.push_char(ch));
        }
        form.toggle_field();
        for ch in "62,5".chars() {
            assert!(form.push_char(ch));
        }
        assert_eq!(form.parse_inputs(), (Some(10), Some(62.5)));
    }

    #[test]
    fn set_form_blank_fields_are_missing() {
        let form = SetForm::default();
        assert_eq!(form.parse_inputs(), (None, None));
    }

    #[test]
    fn set_form_rejects_letters_and_decimal_reps() {
        let mut form = SetForm::default();
        assert!(!form.push_char('x'));
        assert!(!form.push_char('.'));
        assert!(form.reps.is_empty());
    }

    #[test]
    fn set_form_passes_negative_values_through() {
        let mut form = SetForm::default();
        form.push_char('-');
        form.push_char('1');
        form.toggle_field();
        form.push_char('5');
        assert_eq!(form.parse_inputs(), (Some(-1), Some(5.0)));
    }

    #[test]
    fn clear_reps_keeps_weight() {
        let mut form = SetForm {
            reps: "8".to_string(),
            weight: "40".to_string(),
            active: SetField::Weight,
        };
        form.clear_reps();
        assert!(form.reps.is_empty());
        assert_eq!(form.weight, "40");
        assert_eq!(form.active, SetField::Reps);
    }

    #[test]
    fn picker_prefers_catalog_until_typing() {
        let catalog = catalog();
        let mut picker = ExercisePicker::new(catalog.len());
        picker.move_selection(1, catalog.len());
        assert_eq!(picker.chosen_name(&catalog), "Squat");

        picker.push_char('R');
        picker.push_char('o');
        picker.push_char('w');
        assert_eq!(picker.chosen_name(&catalog), "Row");

        picker.move_selection(-5, catalog.len());
        assert_eq!(picker.chosen_name(&catalog), "Bench Press");
    }

    #[test]
    fn picker_with_empty_catalog_starts_on_name() {
        let picker = ExercisePicker::new(0);
        assert_eq!(picker.focus, PickerFocus::NewName);
        assert_eq!(picker.chosen_name(&[]), "");
    }
}
