use crate::nav::YearMonth;

/// Selection index into a list whose length is owned by the controller's
/// screen bundle.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Highlighted day on the calendar grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DayCursor {
    pub(crate) day: u32,
}

impl DayCursor {
    pub(crate) fn new(day: u32, month: YearMonth) -> Self {
        let mut cursor = Self { day };
        cursor.ensure_in_month(month);
        cursor
    }

    /// Move by `offset` days, staying inside the displayed month.
    pub(crate) fn shift(&mut self, offset: i64, month: YearMonth) {
        let last = i64::from(month.days_in_month().max(1));
        self.day = (i64::from(self.day) + offset).clamp(1, last) as u32;
    }

    pub(crate) fn ensure_in_month(&mut self, month: YearMonth) {
        self.day = self.day.clamp(1, month.days_in_month().max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_cursor_clamps() {
        let mut cursor = ListCursor::default();
        cursor.move_selection(5, 3);
        assert_eq!(cursor.selected, 2);
        cursor.move_selection(-10, 3);
        assert_eq!(cursor.selected, 0);
        cursor.select_last(4);
        cursor.ensure_in_bounds(2);
        assert_eq!(cursor.selected, 1);
    }

    #[test]
    fn day_cursor_stays_in_month() {
        let february = YearMonth::new(2025, 2).unwrap();
        let mut cursor = DayCursor::new(31, february);
        assert_eq!(cursor.day, 28);
        cursor.shift(-7, february);
        assert_eq!(cursor.day, 21);
        cursor.shift(-30, february);
        assert_eq!(cursor.day, 1);
    }
}
