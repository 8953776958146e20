use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::errors::ErrorBody;
use crate::serializers::{
    Deleted, PartnershipInput, PartnershipOut, SkillInput, SkillOut, UserDetailOut, UserInput, UserOut,
    UserPartnershipsOut, UserSkillsOut,
};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CreatedDoc { pub id: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::skills::search,
        crate::routes::skills::get,
        crate::routes::skills::create,
        crate::routes::skills::update,
        crate::routes::skills::delete,
        crate::routes::partnerships::get,
        crate::routes::partnerships::create,
        crate::routes::partnerships::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreatedDoc,
            ErrorBody,
            Deleted,
            UserInput,
            UserOut,
            UserDetailOut,
            UserSkillsOut,
            UserPartnershipsOut,
            SkillInput,
            SkillOut,
            PartnershipInput,
            PartnershipOut,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "skills"),
        (name = "partnerships")
    )
)]
pub struct ApiDoc;
