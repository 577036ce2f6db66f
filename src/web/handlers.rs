use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{debug, info};

use crate::{
    api::{handlers::AppState, models::PropertyDetail},
    auth::{self, Credentials, Registration, SessionUser},
    db::{
        self,
        models::{NewContactMessage, NewReview, Property},
    },
    error::Error,
    listing::{
        self,
        admin::{AdminFilter, AdminQuery},
        draft::{PropertyDraft, PropertyForm},
        format_rupees, Furnished, ListingQuery, ListingState, PropertyRecord, SortKey, AMENITIES,
        PRICE_RANGES, PROPERTY_TYPES,
    },
    utils::{
        sanitize::clean_text,
        validation::{validate_email, validate_full_name},
    },
    Result,
};

const MAX_REVIEW_LEN: usize = 1000;
const MAX_MESSAGE_LEN: usize = 2000;
/// Page links shown either side of the current page
const PAGE_WINDOW: usize = 2;

fn render<T: Template>(template: T) -> Result<Html<String>> {
    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

/// One `<option>` of a `<select>`
#[derive(Clone, Debug)]
struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

impl SelectOption {
    fn new(value: &str, label: &str, current: Option<&str>) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: current.is_some_and(|c| c.eq_ignore_ascii_case(value)),
        }
    }
}

fn type_options(any_label: &str, any_value: &str, current: Option<&str>) -> Vec<SelectOption> {
    let current = current.or(Some(any_value));
    std::iter::once(SelectOption::new(any_value, any_label, current))
        .chain(PROPERTY_TYPES.iter().map(|t| SelectOption::new(t, t, current)))
        .collect()
}

fn price_options(current: Option<&str>) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", "Any price", current.or(Some(""))))
        .chain(
            PRICE_RANGES
                .iter()
                .map(|(value, label)| SelectOption::new(value, label, current)),
        )
        .collect()
}

fn status_options(current: Option<&str>) -> Vec<SelectOption> {
    let current = current.or(Some(""));
    vec![
        SelectOption::new("", "Rent or buy", current),
        SelectOption::new("rent", "For Rent", current),
        SelectOption::new("sale", "For Sale", current),
    ]
}

fn sort_options(current: SortKey) -> Vec<SelectOption> {
    SortKey::ALL
        .iter()
        .map(|key| SelectOption::new(key.as_str(), key.label(), Some(current.as_str())))
        .collect()
}

fn state_options(with_all: bool, current: Option<&str>) -> Vec<SelectOption> {
    let all = with_all.then(|| SelectOption::new("all", "All states", current.or(Some("all"))));
    all.into_iter()
        .chain(
            ListingState::ALL
                .iter()
                .map(|s| SelectOption::new(s.as_str(), s.label(), current)),
        )
        .collect()
}

#[derive(Clone, Debug)]
struct PageLink {
    number: usize,
    href: String,
    current: bool,
}

// ---------------------------------------------------------------------------
// Public pages
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    viewer: Option<SessionUser>,
    featured: Vec<PropertyRecord>,
    total_active: usize,
    type_options: Vec<SelectOption>,
    price_options: Vec<SelectOption>,
    status_options: Vec<SelectOption>,
}

/// GET / - Home page with featured listings and the search form
pub async fn index(State(state): State<AppState>, cookies: Cookies) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;

    let featured = db::properties::list_featured(
        &state.pool,
        state.settings.pagination.featured_count as i64,
    )
    .await?;
    let total_active =
        db::properties::count_properties(&state.pool, Some(ListingState::Active)).await? as usize;

    render(HomeTemplate {
        viewer,
        featured: featured.iter().map(Property::to_record).collect(),
        total_active,
        type_options: type_options("Property type", "", None),
        price_options: price_options(None),
        status_options: status_options(None),
    })
}

#[derive(Template)]
#[template(path = "properties.html")]
struct PropertiesTemplate {
    viewer: Option<SessionUser>,
    properties: Vec<PropertyRecord>,
    total_matches: usize,
    page: usize,
    total_pages: usize,
    page_links: Vec<PageLink>,
    prev_href: Option<String>,
    next_href: Option<String>,
    location: String,
    type_options: Vec<SelectOption>,
    price_options: Vec<SelectOption>,
    status_options: Vec<SelectOption>,
    sort_options: Vec<SelectOption>,
}

/// GET /properties - Listing page backed by the query engine
pub async fn properties_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<ListingQuery>,
) -> Result<Response> {
    debug!("Listing page request: {:?}", query);
    let viewer = auth::current_user(&state.pool, &cookies).await?;

    let records = db::properties::active_records(&state.pool).await?;
    let result = listing::query(
        &records,
        &query.params(),
        query.sort_key(),
        query.page(),
        state.settings.pagination.page_size,
    )?;

    // Keep the page within range when the filter shrinks the result
    if result.clamped_page() != result.page {
        let href = format!("/properties?{}", query.to_query_string(result.clamped_page()));
        return Ok(Redirect::to(&href).into_response());
    }

    let href = |page: usize| format!("/properties?{}", query.to_query_string(page));
    let first = result.page.saturating_sub(PAGE_WINDOW).max(1);
    let last = (result.page + PAGE_WINDOW).min(result.total_pages);
    let page_links = (first..=last)
        .map(|number| PageLink {
            number,
            href: href(number),
            current: number == result.page,
        })
        .collect();

    let template = PropertiesTemplate {
        viewer,
        total_matches: result.total_matches,
        page: result.page,
        total_pages: result.total_pages,
        page_links,
        prev_href: result.has_previous().then(|| href(result.page - 1)),
        next_href: result.has_next().then(|| href(result.page + 1)),
        location: query.location.clone().unwrap_or_default(),
        type_options: type_options("All types", "", query.property_type.as_deref()),
        price_options: price_options(query.price.as_deref()),
        status_options: status_options(query.status.as_deref()),
        sort_options: sort_options(query.sort_key()),
        properties: result.items,
    };

    Ok(render(template)?.into_response())
}

#[derive(Template)]
#[template(path = "property.html")]
struct PropertyTemplate {
    viewer: Option<SessionUser>,
    property: PropertyDetail,
    deposit_display: String,
    rating_display: String,
    reviews: Vec<ReviewView>,
    schema_json: String,
    error: Option<String>,
}

struct ReviewView {
    user_name: String,
    stars: String,
    comment: String,
    date: String,
}

async fn render_property(
    state: &AppState,
    id: i64,
    viewer: Option<SessionUser>,
    error: Option<String>,
) -> Result<Html<String>> {
    let property = db::properties::get_active_property(&state.pool, id).await?;
    let reviews = db::reviews::list_reviews_for_property(&state.pool, id).await?;
    let detail = PropertyDetail::new(property, &reviews);

    let schema = super::schema::property_to_schema_json(&detail, &state.settings.server.base_url());
    // Embedded in <script>; must not close the tag early
    let schema_json = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    let template = PropertyTemplate {
        viewer,
        deposit_display: detail
            .deposit
            .map(|d| format!("₹{}", format_rupees(d)))
            .unwrap_or_default(),
        rating_display: detail
            .average_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_default(),
        reviews: reviews
            .into_iter()
            .map(|r| ReviewView {
                stars: "★".repeat(r.rating.clamp(0, 5) as usize),
                comment: r.comment.unwrap_or_default(),
                date: r.created_at.format("%d %b %Y").to_string(),
                user_name: r.user_name,
            })
            .collect(),
        property: detail,
        schema_json,
        error,
    };
    render(template)
}

/// GET /property/:id - Listing detail page
pub async fn property_detail(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;
    render_property(&state, id, viewer, None).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    rating: String,
    #[serde(default)]
    comment: String,
}

/// POST /property/:id/reviews - Leave a review (signed-in users only)
pub async fn submit_review(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let Some(viewer) = auth::current_user(&state.pool, &cookies).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    db::properties::get_active_property(&state.pool, id).await?;

    let created = match form.rating.trim().parse::<i64>() {
        Ok(rating) => db::reviews::create_review(
            &state.pool,
            &NewReview {
                property_id: id,
                user_id: viewer.id,
                rating,
                comment: clean_text(&form.comment, MAX_REVIEW_LEN),
            },
        )
        .await
        .map(|_| ()),
        Err(_) => Err(Error::Validation("Please choose a rating".to_string())),
    };

    match created {
        Ok(()) => {
            info!("User {} reviewed property {}", viewer.id, id);
            Ok(Redirect::to(&format!("/property/{id}#reviews")).into_response())
        }
        Err(Error::Validation(message)) => {
            let html = render_property(&state, id, Some(viewer), Some(message)).await?;
            Ok((StatusCode::BAD_REQUEST, html).into_response())
        }
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    viewer: Option<SessionUser>,
    admin: bool,
    email: String,
    error: Option<String>,
}

impl LoginTemplate {
    fn empty(viewer: Option<SessionUser>, admin: bool) -> Self {
        Self {
            viewer,
            admin,
            email: String::new(),
            error: None,
        }
    }
}

/// GET /login
pub async fn login_page(State(state): State<AppState>, cookies: Cookies) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;
    render(LoginTemplate::empty(viewer, false))
}

fn session_ttl(state: &AppState) -> Duration {
    Duration::hours(state.settings.auth.session_ttl_hours)
}

fn login_failed(credentials: Credentials, admin: bool, message: String) -> Result<Response> {
    let template = LoginTemplate {
        viewer: None,
        admin,
        email: credentials.email,
        error: Some(message),
    };
    Ok((StatusCode::UNAUTHORIZED, render(template)?).into_response())
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(credentials): Form<Credentials>,
) -> Result<Response> {
    match auth::login(&state.pool, &credentials, session_ttl(&state)).await {
        Ok((_, token)) => {
            auth::set_session_cookie(&cookies, token, state.settings.auth.secure_cookies);
            Ok(Redirect::to("/").into_response())
        }
        Err(Error::Unauthorized(message)) => login_failed(credentials, false, message),
        Err(e) => Err(e),
    }
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    viewer: Option<SessionUser>,
    full_name: String,
    email: String,
    error: Option<String>,
}

/// GET /register
pub async fn register_page(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;
    render(RegisterTemplate {
        viewer,
        full_name: String::new(),
        email: String::new(),
        error: None,
    })
}

/// POST /register - Create an account and sign straight in
pub async fn register_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(registration): Form<Registration>,
) -> Result<Response> {
    match auth::register(&state.pool, &registration).await {
        Ok(_) => {
            let credentials = Credentials {
                email: registration.email,
                password: registration.password,
            };
            let (_, token) = auth::login(&state.pool, &credentials, session_ttl(&state)).await?;
            auth::set_session_cookie(&cookies, token, state.settings.auth.secure_cookies);
            Ok(Redirect::to("/").into_response())
        }
        Err(e @ (Error::Validation(_) | Error::Conflict(_))) => {
            let status = e.status_code();
            let message = match e {
                Error::Validation(message) | Error::Conflict(message) => message,
                other => other.to_string(),
            };
            let template = RegisterTemplate {
                viewer: None,
                full_name: registration.full_name,
                email: registration.email,
                error: Some(message),
            };
            Ok((status, render(template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Redirect> {
    if let Some(token) = auth::session_token(&cookies) {
        auth::logout(&state.pool, &token).await?;
    }
    auth::clear_session_cookie(&cookies);
    Ok(Redirect::to("/"))
}

// ---------------------------------------------------------------------------
// Static pages
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    viewer: Option<SessionUser>,
}

/// GET /about
pub async fn about_page(State(state): State<AppState>, cookies: Cookies) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;
    render(AboutTemplate { viewer })
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    viewer: Option<SessionUser>,
    form: ContactForm,
    error: Option<String>,
    sent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    message: String,
}

impl ContactForm {
    fn validate(&self) -> Result<NewContactMessage> {
        Ok(NewContactMessage {
            name: validate_full_name(&self.name)?,
            email: validate_email(&self.email)?,
            phone: clean_text(&self.phone, 30),
            message: clean_text(&self.message, MAX_MESSAGE_LEN)
                .ok_or_else(|| Error::Validation("Please enter a message".to_string()))?,
        })
    }
}

/// GET /contact
pub async fn contact_page(State(state): State<AppState>, cookies: Cookies) -> Result<impl IntoResponse> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;
    let form = ContactForm {
        name: viewer.as_ref().map(|v| v.full_name.clone()).unwrap_or_default(),
        email: viewer.as_ref().map(|v| v.email.clone()).unwrap_or_default(),
        ..Default::default()
    };
    render(ContactTemplate {
        viewer,
        form,
        error: None,
        sent: false,
    })
}

/// POST /contact
pub async fn contact_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let viewer = auth::current_user(&state.pool, &cookies).await?;

    match form.validate() {
        Ok(message) => {
            let stored = db::messages::create_message(&state.pool, &message).await?;
            info!("Contact message {} received", stored.id);
            let template = ContactTemplate {
                viewer,
                form: ContactForm::default(),
                error: None,
                sent: true,
            };
            Ok(render(template)?.into_response())
        }
        Err(Error::Validation(message)) => {
            let template = ContactTemplate {
                viewer,
                form,
                error: Some(message),
                sent: false,
            };
            Ok((StatusCode::BAD_REQUEST, render(template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

async fn admin_viewer(state: &AppState, cookies: &Cookies) -> Result<Option<SessionUser>> {
    Ok(auth::current_user(&state.pool, cookies)
        .await?
        .filter(SessionUser::is_admin))
}

fn to_admin_login() -> Response {
    Redirect::to("/admin/login").into_response()
}

fn to_admin_properties() -> Response {
    Redirect::to("/admin/properties").into_response()
}

/// GET /admin/login
pub async fn admin_login_page(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Response> {
    if admin_viewer(&state, &cookies).await?.is_some() {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }
    Ok(render(LoginTemplate::empty(None, true))?.into_response())
}

/// POST /admin/login
pub async fn admin_login_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(credentials): Form<Credentials>,
) -> Result<Response> {
    match auth::login(&state.pool, &credentials, session_ttl(&state)).await {
        Ok((user, token)) if user.is_admin() => {
            auth::set_session_cookie(&cookies, token, state.settings.auth.secure_cookies);
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Ok((_, token)) => {
            auth::logout(&state.pool, &token).await?;
            login_failed(credentials, true, "Admin access required".to_string())
        }
        Err(Error::Unauthorized(message)) => login_failed(credentials, true, message),
        Err(e) => Err(e),
    }
}

/// Row of the admin property table
struct AdminRow {
    id: i64,
    title: String,
    location: String,
    property_type: String,
    price_display: String,
    owner: String,
    state_label: String,
    state_class: String,
    listed: String,
    state_options: Vec<SelectOption>,
}

impl From<Property> for AdminRow {
    fn from(property: Property) -> Self {
        let state = property.listing_state();
        Self {
            price_display: property.to_record().price_display(),
            owner: property.owner_name.clone().unwrap_or_else(|| "-".to_string()),
            state_label: state.label().to_string(),
            state_class: state.as_str().to_string(),
            listed: property.created_at.format("%d %b %Y").to_string(),
            state_options: state_options(false, Some(state.as_str())),
            id: property.id,
            title: property.title,
            location: property.location,
            property_type: property.property_type,
        }
    }
}

struct DashboardStats {
    total: i64,
    active: i64,
    pending: i64,
    expired: i64,
    new_this_week: i64,
    users: i64,
    reviews: i64,
    messages: i64,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    viewer: Option<SessionUser>,
    stats: DashboardStats,
    recent: Vec<AdminRow>,
}

/// GET /admin/dashboard
pub async fn admin_dashboard(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };
    let pool = &state.pool;

    let stats = DashboardStats {
        total: db::properties::count_properties(pool, None).await?,
        active: db::properties::count_properties(pool, Some(ListingState::Active)).await?,
        pending: db::properties::count_properties(pool, Some(ListingState::Pending)).await?,
        expired: db::properties::count_properties(pool, Some(ListingState::Expired)).await?,
        new_this_week: db::properties::count_created_since(pool, Utc::now() - Duration::days(7))
            .await?,
        users: db::users::count_users(pool).await?,
        reviews: db::reviews::count_reviews(pool).await?,
        messages: db::messages::count_messages(pool).await?,
    };
    let recent = db::properties::list_recent(pool, 5).await?;

    let template = AdminDashboardTemplate {
        viewer: Some(admin),
        stats,
        recent: recent.into_iter().map(AdminRow::from).collect(),
    };
    Ok(render(template)?.into_response())
}

#[derive(Template)]
#[template(path = "admin_properties.html")]
struct AdminPropertiesTemplate {
    viewer: Option<SessionUser>,
    rows: Vec<AdminRow>,
    total: usize,
    search: String,
    state_options: Vec<SelectOption>,
    type_options: Vec<SelectOption>,
}

/// GET /admin/properties - Filterable table of every stored listing
pub async fn admin_properties(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<AdminQuery>,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    let properties = db::properties::list_all_properties(&state.pool).await?;
    let total = properties.len();
    let rows: Vec<AdminRow> = AdminFilter::from_query(&query)
        .apply(properties)
        .into_iter()
        .map(AdminRow::from)
        .collect();

    let template = AdminPropertiesTemplate {
        viewer: Some(admin),
        rows,
        total,
        search: query.search.clone().unwrap_or_default(),
        state_options: state_options(true, query.state.as_deref()),
        type_options: type_options("All types", "all", query.property_type.as_deref()),
    };
    Ok(render(template)?.into_response())
}

/// POST /admin/properties/:id/delete
pub async fn admin_delete_property(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    db::properties::delete_property(&state.pool, id).await?;
    info!("Admin {} deleted property {}", admin.id, id);
    Ok(to_admin_properties())
}

#[derive(Debug, Deserialize)]
pub struct StateForm {
    state: String,
}

/// POST /admin/properties/:id/state
pub async fn admin_set_state(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Form(form): Form<StateForm>,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    let new_state = ListingState::parse(&form.state)
        .ok_or_else(|| Error::Validation(format!("Unknown listing state '{}'", form.state)))?;
    db::properties::set_state(&state.pool, id, new_state).await?;
    info!(
        "Admin {} marked property {} as {}",
        admin.id,
        id,
        new_state.as_str()
    );
    Ok(to_admin_properties())
}

/// POST /admin/properties/bulk-delete - `ids` may repeat
pub async fn admin_bulk_delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    let ids: Vec<i64> = fields
        .iter()
        .filter(|(key, _)| key == "ids")
        .filter_map(|(_, value)| value.parse().ok())
        .collect();
    let deleted = db::properties::delete_properties(&state.pool, &ids).await?;
    info!("Admin {} bulk-deleted {} properties", admin.id, deleted);
    Ok(to_admin_properties())
}

#[derive(Template)]
#[template(path = "admin_add_property.html")]
struct AdminAddPropertyTemplate {
    viewer: Option<SessionUser>,
    form: PropertyForm,
    error: Option<String>,
    type_options: Vec<SelectOption>,
    furnished_options: Vec<SelectOption>,
    amenity_hint: String,
}

impl AdminAddPropertyTemplate {
    fn new(viewer: SessionUser, form: PropertyForm, error: Option<String>) -> Self {
        let furnished = Some(form.furnished.as_str()).filter(|f| !f.is_empty());
        let furnished_options = [
            Furnished::Unfurnished,
            Furnished::SemiFurnished,
            Furnished::Furnished,
        ]
        .iter()
        .map(|f| {
            SelectOption::new(
                f.as_str(),
                f.label(),
                furnished.or(Some(Furnished::default().as_str())),
            )
        })
        .collect();

        Self {
            viewer: Some(viewer),
            type_options: type_options("Select type", "", Some(form.property_type.as_str())),
            furnished_options,
            amenity_hint: AMENITIES.join(", "),
            form,
            error,
        }
    }
}

/// GET /admin/properties/add
pub async fn admin_add_property_page(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    let form = PropertyForm {
        listing_for: "rent".to_string(),
        ..Default::default()
    };
    Ok(render(AdminAddPropertyTemplate::new(admin, form, None))?.into_response())
}

/// POST /admin/properties/add
pub async fn admin_add_property_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<PropertyForm>,
) -> Result<Response> {
    let Some(admin) = admin_viewer(&state, &cookies).await? else {
        return Ok(to_admin_login());
    };

    let validated = PropertyDraft::try_from(form.clone()).and_then(PropertyDraft::validate);
    match validated {
        Ok(new_property) => {
            let property = db::properties::create_property(&state.pool, &new_property).await?;
            info!("Admin {} added property {}", admin.id, property.id);
            Ok(to_admin_properties())
        }
        Err(Error::Validation(message)) => {
            let template = AdminAddPropertyTemplate::new(admin, form, Some(message));
            Ok((StatusCode::BAD_REQUEST, render(template)?).into_response())
        }
        Err(e) => Err(e),
    }
}
