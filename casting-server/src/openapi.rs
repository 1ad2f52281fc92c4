use crate::api::{actors, movies};
use crate::errors::ErrorBody;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const MOVIES_TAG: &str = "Movies API";
pub(crate) const ACTORS_TAG: &str = "Actors API";

/// Name of the bearer token security scheme referenced by protected paths
pub(crate) const BEARER_AUTH: &str = "bearer_auth";

#[derive(OpenApi)]
#[openapi(
    paths(
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
    ),
    components(schemas(ErrorBody)),
    modifiers(&BearerSecurity),
    tags(
        (name = HEALTH_TAG, description = "Service status endpoints"),
        (name = MOVIES_TAG, description = "Movie management"),
        (name = ACTORS_TAG, description = "Actor management"),
    ),
    info(
        title = "Casting Agency API",
        description = "Manage the actors and movies of a casting agency",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
