//! Web server: blog pages, the recommendation survey and JSON APIs.

use crate::api::{envelope, FormatData, PostData, PostPage, PostSummary};
use crate::context::{open_site, open_submissions};
use anyhow::{Context, Result};
use askama::Template;
use axum::{
    extract::{Form, Path as AxumPath, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use datinghub_core::store::{
    category_counts, next_post, previous_post, published, published_in_category,
    published_with_tag, recent, related,
};
use datinghub_core::survey::{submit, LogMailer, Mailer, SubmissionStore, SurveyError, SurveyForm};
use datinghub_core::{format_content, paginate, Category, Config, Post, PostError, PostService};
use datinghub_render::{
    render_blocks, CategoryLink, HomeTemplate, InfoPage, InfoPageTemplate, ListingTemplate,
    NotFoundTemplate, Pager, PostCard, PostContext, PostTemplate, SiteMeta, SurveyTemplate,
    ThankYouTemplate, PAGES,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    service: PostService,
    config: Arc<Config>,
    site: SiteMeta,
    submissions: Arc<SubmissionStore>,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        config: Config,
        service: PostService,
        submissions: SubmissionStore,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            site: SiteMeta::from_config(&config),
            config: Arc::new(config),
            service,
            submissions: Arc::new(submissions),
            mailer,
        }
    }
}

/// Start the site server
pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let site = open_site(config_path)?;
    let addr = format!(
        "{}:{}",
        site.config.server.host,
        port.unwrap_or(site.config.server.port)
    );

    let submissions = open_submissions(&site.config)?;
    let state = AppState::new(
        site.config,
        site.service,
        submissions,
        Arc::new(LogMailer::new()),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving on http://{}", addr);
    println!("\n🚀 Serving at http://{}", addr);
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir();

    let mut app = Router::new()
        .route("/", get(home))
        .route("/health/", get(health))
        .route("/blog/", get(blog_index))
        .route("/blog/category/{category}/", get(category_listing))
        .route("/blog/tag/{tag}/", get(tag_listing))
        .route("/blog/{slug}/", get(post_detail))
        .route(
            "/tools/dating-recommendations/",
            get(survey_form).post(survey_submit),
        )
        .route("/tools/thank-you/", get(thank_you))
        .route("/api/posts", get(api_posts))
        .route("/api/posts/{slug}", get(api_post))
        .route("/api/format", post(api_format));

    for page in PAGES {
        app = app.route(
            page.path,
            get(move |State(state): State<AppState>| async move { info_page(&state, page) }),
        );
    }

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.fallback(fallback_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ---- Rendering helpers ----

fn render_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Template error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn not_found(state: &AppState, message: impl Into<String>) -> Response {
    render_page(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            site: state.site.clone(),
            message: message.into(),
        },
    )
}

fn error_status(err: &PostError) -> StatusCode {
    match err {
        PostError::Validation(_) => StatusCode::BAD_REQUEST,
        PostError::PersistenceConflict(_) => StatusCode::CONFLICT,
        PostError::NotFound(_) => StatusCode::NOT_FOUND,
        PostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

struct Listing<'a> {
    heading: String,
    posts: Vec<Post>,
    featured: Vec<PostCard>,
    requested_page: Option<&'a str>,
    base_path: String,
}

fn render_listing(state: &AppState, listing: Listing<'_>) -> Response {
    let all = published(state.service.store());
    let blog = &state.config.blog;

    let cards: Vec<PostCard> = listing.posts.iter().map(PostCard::from).collect();
    let page = paginate(cards, blog.posts_per_page, listing.requested_page);
    let pager = Pager::new(&page, &listing.base_path);

    let template = ListingTemplate {
        site: state.site.clone(),
        page_title: format!("{} - {}", listing.heading, state.site.name),
        heading: listing.heading,
        posts: page.items,
        featured: listing.featured,
        pager,
        categories: category_counts(&all).iter().map(CategoryLink::from).collect(),
        recent: recent(&all, None, blog.recent_posts)
            .iter()
            .map(PostCard::from)
            .collect(),
    };
    render_page(StatusCode::OK, &template)
}

// ---- Site pages ----

async fn home(State(state): State<AppState>) -> Response {
    let latest = recent(
        &published(state.service.store()),
        None,
        state.config.blog.featured_posts,
    );
    render_page(
        StatusCode::OK,
        &HomeTemplate::new(
            state.site.clone(),
            latest.iter().map(PostCard::from).collect(),
        ),
    )
}

fn info_page(state: &AppState, page: &InfoPage) -> Response {
    render_page(
        StatusCode::OK,
        &InfoPageTemplate::build(state.site.clone(), page),
    )
}

async fn health(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "posts": published(state.service.store()).len(),
    }))
    .into_response()
}

// ---- Blog pages ----

#[derive(Deserialize)]
struct PageParams {
    page: Option<String>,
}

async fn blog_index(State(state): State<AppState>, Query(params): Query<PageParams>) -> Response {
    let posts = published(state.service.store());

    // Newest posts lead the first page
    let featured = match params.page.as_deref() {
        None | Some("1") => posts
            .iter()
            .take(state.config.blog.featured_posts)
            .map(PostCard::from)
            .collect(),
        _ => Vec::new(),
    };

    render_listing(
        &state,
        Listing {
            heading: "Blog".to_string(),
            posts,
            featured,
            requested_page: params.page.as_deref(),
            base_path: "/blog/".to_string(),
        },
    )
}

async fn category_listing(
    State(state): State<AppState>,
    AxumPath(category): AxumPath<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let Some(category) = Category::from_str(&category) else {
        return not_found(&state, format!("No category named '{}'", category));
    };

    render_listing(
        &state,
        Listing {
            heading: category.display_name().to_string(),
            posts: published_in_category(state.service.store(), category),
            featured: Vec::new(),
            requested_page: params.page.as_deref(),
            base_path: format!("/blog/category/{}/", category.as_str()),
        },
    )
}

async fn tag_listing(
    State(state): State<AppState>,
    AxumPath(tag): AxumPath<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let posts = published_with_tag(state.service.store(), &tag);
    let name = posts
        .iter()
        .flat_map(|p| p.tags.iter())
        .find(|t| t.slug == tag)
        .map(|t| t.name.clone());

    let Some(name) = name else {
        return not_found(&state, format!("No posts tagged '{}'", tag));
    };

    render_listing(
        &state,
        Listing {
            heading: format!("Posts tagged \"{}\"", name),
            posts,
            featured: Vec::new(),
            requested_page: params.page.as_deref(),
            base_path: format!("/blog/tag/{}/", tag),
        },
    )
}

async fn post_detail(State(state): State<AppState>, AxumPath(slug): AxumPath<String>) -> Response {
    let post = match state.service.get_published(&slug) {
        Ok(post) => post,
        Err(PostError::NotFound(_)) => return not_found(&state, "That post doesn't exist."),
        Err(err) => {
            tracing::error!("Failed to load {}: {}", slug, err);
            return (error_status(&err), err.to_string()).into_response();
        }
    };

    if let Err(err) = state.service.record_view(&slug) {
        tracing::warn!("Failed to record view for {}: {}", slug, err);
    }

    let all = published(state.service.store());
    let blog = &state.config.blog;
    let related_posts = related(&all, &post, blog.related_posts);
    let recent_posts = recent(&all, Some(post.id), blog.recent_posts);
    let categories = category_counts(&all);
    let next = next_post(&all, &post);
    let previous = previous_post(&all, &post);

    let template = PostTemplate::build(PostContext {
        site: state.site.clone(),
        post: &post,
        related: &related_posts,
        recent: &recent_posts,
        categories: &categories,
        next: next.as_ref(),
        previous: previous.as_ref(),
    });
    render_page(StatusCode::OK, &template)
}

// ---- Survey ----

async fn survey_form(State(state): State<AppState>) -> Response {
    render_page(
        StatusCode::OK,
        &SurveyTemplate {
            site: state.site.clone(),
            error: None,
            email: String::new(),
            name: String::new(),
        },
    )
}

async fn survey_submit(State(state): State<AppState>, Form(form): Form<SurveyForm>) -> Response {
    match submit(
        &form,
        &state.submissions,
        state.mailer.as_ref(),
        &state.config.survey,
    ) {
        Ok(_) => Redirect::to("/tools/thank-you/").into_response(),
        Err(err @ SurveyError::InvalidEmail) => render_page(
            StatusCode::BAD_REQUEST,
            &SurveyTemplate {
                site: state.site.clone(),
                error: Some(err.to_string()),
                email: form.email,
                name: form.name,
            },
        ),
        Err(err @ SurveyError::Storage(_)) => {
            tracing::error!("Failed to store survey submission: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save your request, please try again.",
            )
                .into_response()
        }
        Err(err) => {
            // Submission is already stored; only notification failed
            tracing::error!("Survey notification failed: {}", err);
            Redirect::to("/tools/thank-you/").into_response()
        }
    }
}

async fn thank_you(State(state): State<AppState>) -> Response {
    render_page(
        StatusCode::OK,
        &ThankYouTemplate {
            site: state.site.clone(),
            response_window_hours: state.config.survey.response_window_hours,
        },
    )
}

// ---- API handlers ----

#[derive(Deserialize)]
struct PostListParams {
    category: Option<String>,
    tag: Option<String>,
    page: Option<String>,
}

async fn api_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Response {
    let category = match params.category.as_deref().map(Category::from_str) {
        Some(None) => return json_error(StatusCode::BAD_REQUEST, "Unknown category"),
        Some(category) => category,
        None => None,
    };

    let posts: Vec<PostSummary> = published(state.service.store())
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| params.tag.as_deref().map_or(true, |t| p.has_tag(t)))
        .map(PostSummary::from)
        .collect();

    let page = paginate(posts, state.config.blog.posts_per_page, params.page.as_deref());
    Json(envelope(
        "post.list",
        PostPage {
            page: page.number,
            num_pages: page.num_pages,
            total: page.total,
            posts: page.items,
        },
    ))
    .into_response()
}

async fn api_post(State(state): State<AppState>, AxumPath(slug): AxumPath<String>) -> Response {
    match state.service.get_published(&slug) {
        Ok(post) => Json(envelope("post.full", PostData::from(&post))).into_response(),
        Err(err) => json_error(error_status(&err), err.to_string()),
    }
}

#[derive(Deserialize)]
struct FormatRequest {
    text: String,
}

async fn api_format(Json(request): Json<FormatRequest>) -> Response {
    let blocks = format_content(&request.text);
    let html = render_blocks(&blocks);
    Json(envelope("content.blocks", FormatData { blocks, html })).into_response()
}

async fn fallback_404(State(state): State<AppState>) -> Response {
    not_found(&state, "The page you're looking for doesn't exist.")
}
