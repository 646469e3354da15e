//! Explanation text for a recommendation.

use crate::recommendation::domain::{CandidateScore, RecommendationError, SimilarTask};
use crate::workshop::domain::TaskCode;
use minijinja::Environment;
use serde_json::{Value, json};

const EXPLANATION_TEMPLATE: &str = concat!(
    "{% if candidates | length == 1 %}Recommended engineer for task {{ task }}",
    "{% if task_name %} ({{ task_name }}){% endif %}: ",
    "{% else %}Recommended engineers for task {{ task }}",
    "{% if task_name %} ({{ task_name }}){% endif %}: {% endif %}",
    "{% for candidate in candidates %}{{ candidate.engineer }} (score {{ candidate.score }})",
    "{% if not loop.last %}, {% endif %}{% endfor %}. ",
    "Selected {{ selected.engineer }} with suitability {{ selected.score }}.",
    "{% if similar %} Similar tasks: {% for item in similar %}{{ item.task }} ",
    "(similarity {{ item.similarity }}){% if not loop.last %}, {% endif %}{% endfor %}.",
    "{% endif %}",
);

pub(crate) struct ExplanationInput<'a> {
    pub(crate) task: &'a TaskCode,
    pub(crate) task_name: Option<&'a str>,
    pub(crate) ranked: &'a [CandidateScore],
    pub(crate) selected: &'a CandidateScore,
    pub(crate) similar: &'a [SimilarTask],
}

pub(crate) fn render(input: &ExplanationInput<'_>) -> Result<String, RecommendationError> {
    let candidate = |score: &CandidateScore| {
        json!({
            "engineer": score.engineer.as_str(),
            "score": format!("{:.2}", score.score),
        })
    };
    let context = json!({
        "task": input.task.as_str(),
        "task_name": input.task_name,
        "candidates": input.ranked.iter().map(candidate).collect::<Vec<Value>>(),
        "selected": candidate(input.selected),
        "similar": input
            .similar
            .iter()
            .map(|item| json!({
                "task": item.task.as_str(),
                "similarity": format!("{:.2}", item.similarity),
            }))
            .collect::<Vec<Value>>(),
    });
    Environment::new()
        .render_str(EXPLANATION_TEMPLATE, context)
        .map_err(|error| RecommendationError::Explanation {
            task: input.task.clone(),
            reason: error.to_string(),
        })
}
