use crate::domain::collection::EntityTag;
use crate::domain::types::EntityId;
use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::dto::search::{SearchResponse, SearchResults};
use crate::dto::users::UserDto;
use crate::forms::SearchPath;
use crate::repository::{CategoryReader, ProductReader, RepositoryResult, UserReader};

use super::{ServiceError, ServiceResult};

/// Search one collection.
///
/// A term shaped like an id is looked up directly, whether or not the entity
/// is active, and yields at most one result. Any other term is matched as a
/// case-insensitive substring against active entities only.
pub async fn search<R>(path: SearchPath, repo: &R) -> ServiceResult<SearchResponse>
where
    R: UserReader + CategoryReader + ProductReader,
{
    let tag = EntityTag::resolve(&path.coleccion)?;
    let term = path.termino.as_str();

    let results = match EntityId::new(term) {
        Ok(id) => find_by_id(tag, &id, repo),
        Err(_) => find_by_term(tag, term, repo),
    };

    match results {
        Ok(results) => Ok(SearchResponse { results }),
        Err(e) => {
            log::error!("Failed to search {tag} for `{term}`: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn find_by_id<R>(tag: EntityTag, id: &EntityId, repo: &R) -> RepositoryResult<SearchResults>
where
    R: UserReader + CategoryReader + ProductReader,
{
    Ok(match tag {
        EntityTag::User => SearchResults::Users(
            repo.get_user_by_id(id)?.into_iter().map(UserDto::from).collect(),
        ),
        EntityTag::Category => SearchResults::Categories(
            repo.get_category_by_id(id)?
                .into_iter()
                .map(CategoryDto::from)
                .collect(),
        ),
        EntityTag::Product => SearchResults::Products(
            repo.get_product_by_id(id)?
                .into_iter()
                .map(ProductDto::from)
                .collect(),
        ),
    })
}

fn find_by_term<R>(tag: EntityTag, term: &str, repo: &R) -> RepositoryResult<SearchResults>
where
    R: UserReader + CategoryReader + ProductReader,
{
    Ok(match tag {
        EntityTag::User => SearchResults::Users(
            repo.search_users(term)?
                .into_iter()
                .map(UserDto::from)
                .collect(),
        ),
        EntityTag::Category => SearchResults::Categories(
            repo.search_categories(term)?
                .into_iter()
                .map(CategoryDto::from)
                .collect(),
        ),
        EntityTag::Product => SearchResults::Products(
            repo.search_products(term)?
                .into_iter()
                .map(ProductDto::from)
                .collect(),
        ),
    })
}
