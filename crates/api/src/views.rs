//! Server-rendered HTML pages.
//!
//! Pages are plain `format!` templates. Every user-controlled value goes
//! through [`escape`] before it is interpolated.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use yanote_core::access::Principal;
use yanote_core::error::{FieldErrors, NON_FIELD_ERRORS};
use yanote_core::notes::{NoteForm, FIELD_SLUG, FIELD_TEXT, FIELD_TITLE};
use yanote_db::models::note::Note;

use crate::paths;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// A rendered page with its status code.
pub fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

fn layout(title: &str, principal: Option<&Principal>, body: &str) -> String {
    let nav = match principal {
        Some(Principal::User { username, .. }) => format!(
            "<a href=\"{home}\">Главная</a> \
<a href=\"{list}\">Мои заметки</a> \
<a href=\"{add}\">Добавить заметку</a> \
<span class=\"user\">{user}</span> \
<form method=\"post\" action=\"{logout}\" class=\"inline\"><button type=\"submit\">Выйти</button></form>",
            home = paths::HOME,
            list = paths::NOTES_LIST,
            add = paths::NOTE_ADD,
            user = escape(username),
            logout = paths::LOGOUT,
        ),
        Some(Principal::Anonymous) => format!(
            "<a href=\"{}\">Главная</a> <a href=\"{}\">Войти</a> <a href=\"{}\">Регистрация</a>",
            paths::HOME,
            paths::LOGIN,
            paths::SIGNUP
        ),
        None => format!("<a href=\"{}\">Главная</a>", paths::HOME),
    };
    format!(
        "<!doctype html><html lang=\"ru\"><head><meta charset=\"utf-8\">\
<title>{title} | YaNote</title></head><body>\
<header><nav>{nav}</nav></header>\
<main>{body}</main>\
</body></html>",
        title = escape(title),
    )
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!("<ul class=\"errorlist\">{items}</ul>")
}

fn input_row(label: &str, name: &str, kind: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        "<p><label for=\"id_{name}\">{label}</label>\
<input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\">{errors}</p>",
        value = escape(value),
        errors = error_list(errors.get(name)),
    )
}

pub fn home(principal: &Principal) -> String {
    let body = match principal.username() {
        Some(username) => format!(
            "<h1>YaNote</h1><p>Здравствуйте, {}! Ваши заметки доступны только вам.</p>\
<p><a href=\"{}\">Перейти к заметкам</a></p>",
            escape(username),
            paths::NOTES_LIST
        ),
        None => format!(
            "<h1>YaNote</h1><p>Личные заметки, которые видите только вы.</p>\
<p><a href=\"{}\">Войдите</a> или <a href=\"{}\">зарегистрируйтесь</a>.</p>",
            paths::LOGIN,
            paths::SIGNUP
        ),
    };
    layout("Главная", Some(principal), &body)
}

pub fn note_list(principal: &Principal, notes: &[Note]) -> String {
    let items: String = notes
        .iter()
        .map(|note| {
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                paths::note_detail(&note.slug),
                escape(&note.title)
            )
        })
        .collect();
    let body = if items.is_empty() {
        format!(
            "<h1>Мои заметки</h1><p>Заметок пока нет. <a href=\"{}\">Добавить</a></p>",
            paths::NOTE_ADD
        )
    } else {
        format!("<h1>Мои заметки</h1><ul class=\"notes\">{items}</ul>")
    };
    layout("Мои заметки", Some(principal), &body)
}

/// Create or edit form. `action` is the URL the form posts back to.
pub fn note_form(
    principal: &Principal,
    heading: &str,
    action: &str,
    form: &NoteForm,
    errors: &FieldErrors,
) -> String {
    let body = format!(
        "<h1>{heading}</h1>\
<form method=\"post\" action=\"{action}\">{non_field}\
{title}\
<p><label for=\"id_{text_name}\">Текст</label>\
<textarea name=\"{text_name}\" id=\"id_{text_name}\">{text}</textarea>{text_errors}</p>\
{slug}\
<button type=\"submit\">Сохранить</button></form>",
        heading = escape(heading),
        action = escape(action),
        non_field = error_list(errors.get(NON_FIELD_ERRORS)),
        title = input_row("Заголовок", FIELD_TITLE, "text", &form.title, errors),
        text_name = FIELD_TEXT,
        text = escape(&form.text),
        text_errors = error_list(errors.get(FIELD_TEXT)),
        slug = input_row("Адрес для страницы с заметкой", FIELD_SLUG, "text", &form.slug, errors),
    );
    layout(heading, Some(principal), &body)
}

pub fn note_detail(principal: &Principal, note: &Note) -> String {
    let body = format!(
        "<article><h1>{title}</h1><div class=\"text\">{text}</div></article>\
<p><a href=\"{edit}\">Редактировать</a> <a href=\"{delete}\">Удалить</a></p>",
        title = escape(&note.title),
        text = escape(&note.text),
        edit = paths::note_edit(&note.slug),
        delete = paths::note_delete(&note.slug),
    );
    layout(&note.title, Some(principal), &body)
}

pub fn note_delete_confirm(principal: &Principal, note: &Note) -> String {
    let body = format!(
        "<h1>Удалить заметку?</h1><p>{title}</p>\
<form method=\"post\" action=\"{action}\"><button type=\"submit\">Удалить</button></form>\
<p><a href=\"{back}\">Отмена</a></p>",
        title = escape(&note.title),
        action = paths::note_delete(&note.slug),
        back = paths::note_detail(&note.slug),
    );
    layout("Удаление заметки", Some(principal), &body)
}

pub fn success(principal: &Principal) -> String {
    let body = format!(
        "<h1>Успешно!</h1><p>Изменения сохранены.</p><p><a href=\"{}\">Вернуться к заметкам</a></p>",
        paths::NOTES_LIST
    );
    layout("Успешно", Some(principal), &body)
}

pub fn signup(username: &str, errors: &FieldErrors) -> String {
    let body = format!(
        "<h1>Регистрация</h1>\
<form method=\"post\" action=\"{action}\">{non_field}{username}{password1}{password2}\
<button type=\"submit\">Зарегистрироваться</button></form>",
        action = paths::SIGNUP,
        non_field = error_list(errors.get(NON_FIELD_ERRORS)),
        username = input_row("Имя пользователя", "username", "text", username, errors),
        password1 = input_row("Пароль", "password1", "password", "", errors),
        password2 = input_row("Подтверждение пароля", "password2", "password", "", errors),
    );
    layout("Регистрация", Some(&Principal::Anonymous), &body)
}

pub fn login(principal: &Principal, username: &str, next: Option<&str>, errors: &FieldErrors) -> String {
    let next_field = next
        .map(|n| format!("<input type=\"hidden\" name=\"next\" value=\"{}\">", escape(n)))
        .unwrap_or_default();
    let body = format!(
        "<h1>Войти</h1>\
<form method=\"post\" action=\"{action}\">{non_field}{username}{password}{next_field}\
<button type=\"submit\">Войти</button></form>\
<p>Нет аккаунта? <a href=\"{signup}\">Зарегистрируйтесь</a></p>",
        action = paths::LOGIN,
        non_field = error_list(errors.get(NON_FIELD_ERRORS)),
        username = input_row("Имя пользователя", "username", "text", username, errors),
        password = input_row("Пароль", "password", "password", "", errors),
        signup = paths::SIGNUP,
    );
    layout("Войти", Some(principal), &body)
}

pub fn logged_out() -> String {
    let body = format!(
        "<h1>Вы вышли из своей учётной записи</h1><p><a href=\"{}\">Войти снова</a></p>",
        paths::LOGIN
    );
    layout("Выход", Some(&Principal::Anonymous), &body)
}

pub fn error(status: StatusCode, message: &str) -> String {
    let heading = match status {
        StatusCode::NOT_FOUND => "Страница не найдена",
        StatusCode::BAD_REQUEST => "Некорректный запрос",
        StatusCode::CONFLICT => "Конфликт данных",
        _ => "Ошибка сервера",
    };
    let body = format!(
        "<h1>{heading}</h1><p>{}</p><p class=\"status\">{}</p>",
        escape(message),
        status.as_u16()
    );
    layout(heading, None, &body)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn note(title: &str, text: &str) -> Note {
        Note {
            id: 1,
            title: title.to_string(),
            text: text.to_string(),
            slug: "zametka".to_string(),
            author_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn note_content_is_escaped() {
        let html = note_detail(&Principal::user(1, "a"), &note("<b>", "<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn form_shows_values_and_field_errors() {
        let form = NoteForm::new("Заголовок", "Текст", "taken");
        let errors = FieldErrors::single(FIELD_SLUG, "taken - exists");
        let html = note_form(&Principal::user(1, "a"), "Новая заметка", "/add/", &form, &errors);

        assert!(html.contains("name=\"title\" id=\"id_title\" value=\"Заголовок\""));
        assert!(html.contains("<textarea name=\"text\" id=\"id_text\">Текст</textarea>"));
        assert!(html.contains("<ul class=\"errorlist\"><li>taken - exists</li></ul>"));
    }

    #[test]
    fn navigation_depends_on_principal() {
        let anon = home(&Principal::Anonymous);
        assert!(anon.contains(paths::LOGIN));
        assert!(!anon.contains(paths::LOGOUT));

        let user = home(&Principal::user(1, "Автор"));
        assert!(user.contains(paths::LOGOUT));
        assert!(user.contains("Автор"));
    }

    #[test]
    fn empty_list_offers_to_add() {
        let html = note_list(&Principal::user(1, "a"), &[]);
        assert!(html.contains("Заметок пока нет"));
    }
}
