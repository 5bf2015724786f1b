use axum::Json;

use crate::domain::TargetLanguage;

use super::dto::{LanguageDto, LanguagesResponse};

pub async fn languages_handler() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: TargetLanguage::ALL.into_iter().map(LanguageDto::from).collect(),
    })
}
