use std::collections::BTreeMap;

use crate::api::models::*;

/// Fields of the create/edit form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Director,
    Year,
    Rating,
    Genre,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Director,
        FormField::Year,
        FormField::Rating,
        FormField::Genre,
        FormField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Director => "Director",
            FormField::Year => "Year",
            FormField::Rating => "Rating",
            FormField::Genre => "Genre",
            FormField::Description => "Description",
        }
    }

    pub fn required(self) -> bool {
        self != FormField::Description
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One message per violated field.
pub type FormErrors = BTreeMap<FormField, String>;

/// Text buffers behind the create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmForm {
    pub title: String,
    pub director: String,
    pub year: String,
    pub rating: String,
    pub genre: String,
    pub description: String,
    pub active: FormField,
    pub errors: FormErrors,
}

impl FilmForm {
    /// Blank form for a new film, seeded with the current year.
    pub fn new(current_year: i32) -> Self {
        Self {
            title: String::new(),
            director: String::new(),
            year: current_year.to_string(),
            rating: "0.0".to_string(),
            genre: String::new(),
            description: String::new(),
            active: FormField::Title,
            errors: FormErrors::new(),
        }
    }

    /// Populate the form from an existing film when editing.
    pub fn from_film(film: &Film) -> Self {
        Self {
            title: film.title.clone(),
            director: film.director.clone(),
            year: film.year.to_string(),
            rating: film.rating.to_string(),
            genre: film.genre.clone(),
            description: film.description.clone().unwrap_or_default(),
            active: FormField::Title,
            errors: FormErrors::new(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Director => &self.director,
            FormField::Year => &self.year,
            FormField::Rating => &self.rating,
            FormField::Genre => &self.genre,
            FormField::Description => &self.description,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Director => &mut self.director,
            FormField::Year => &mut self.year,
            FormField::Rating => &mut self.rating,
            FormField::Genre => &mut self.genre,
            FormField::Description => &mut self.description,
        }
    }

    pub fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub fn focus_prev(&mut self) {
        self.active = self.active.prev();
    }

    /// Append a character to the active field. Numeric fields only take
    /// digits (and a single decimal point for the rating).
    pub fn push_char(&mut self, ch: char) -> bool {
        let field = self.active;
        let accepted = match field {
            FormField::Year => ch.is_ascii_digit(),
            FormField::Rating => ch.is_ascii_digit() || (ch == '.' && !self.rating.contains('.')),
            _ => !ch.is_control(),
        };
        if accepted {
            self.value_mut(field).push(ch);
            self.errors.remove(&field);
        }
        accepted
    }

    /// Remove the last character from the active field.
    pub fn backspace(&mut self) {
        let field = self.active;
        if self.value_mut(field).pop().is_some() {
            self.errors.remove(&field);
        }
    }

    /// Check every field and build the request body. On failure the map holds
    /// exactly the violated fields.
    pub fn validate(&self) -> Result<FilmPayload, FormErrors> {
        let mut errors = FormErrors::new();

        check_text(
            &mut errors,
            FormField::Title,
            &self.title,
            TITLE_MAX_LEN,
            "Title is required",
            "Title must be at most 200 characters",
        );
        check_text(
            &mut errors,
            FormField::Director,
            &self.director,
            DIRECTOR_MAX_LEN,
            "Director is required",
            "Director must be at most 100 characters",
        );

        let year = self
            .year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y));
        if year.is_none() {
            errors.insert(
                FormField::Year,
                format!("Year must be between {YEAR_MIN} and {YEAR_MAX}"),
            );
        }

        let rating = self
            .rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| (RATING_MIN..=RATING_MAX).contains(r));
        if rating.is_none() {
            errors.insert(
                FormField::Rating,
                "Rating must be between 0.0 and 10.0".to_string(),
            );
        }

        check_text(
            &mut errors,
            FormField::Genre,
            &self.genre,
            GENRE_MAX_LEN,
            "Genre is required",
            "Genre must be at most 50 characters",
        );

        if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.insert(
                FormField::Description,
                "Description must be at most 1000 characters".to_string(),
            );
        }

        match (year, rating) {
            (Some(year), Some(rating)) if errors.is_empty() => Ok(FilmPayload {
                title: self.title.clone(),
                director: self.director.clone(),
                year,
                rating,
                genre: self.genre.clone(),
                description: if self.description.trim().is_empty() {
                    None
                } else {
                    Some(self.description.clone())
                },
            }),
            _ => Err(errors),
        }
    }
}

fn check_text(
    errors: &mut FormErrors,
    field: FormField,
    value: &str,
    max_len: usize,
    missing: &str,
    too_long: &str,
) {
    if value.trim().is_empty() {
        errors.insert(field, missing.to_string());
    } else if value.chars().count() > max_len {
        errors.insert(field, too_long.to_string());
    }
}
