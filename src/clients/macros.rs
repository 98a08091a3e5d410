/// Generates `get_<name>` and `require_<name>` lookups for a client whose
/// `inner` field is a `ResourceClient`.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                /// Same as the `get_` lookup, with a missing record reported as not found.
                #[tracing::instrument(skip(self))]
                pub async fn [<require_ $entity_name_snake>](&self, id: String) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    match self.inner.get(id.clone()).await {
                        Ok(Some(item)) => Ok(item),
                        Ok(None) => Err(<$error>::from($crate::actor_framework::FrameworkError::NotFound(id))),
                        Err(e) => Err(<$error>::from(e)),
                    }
                }
            }
        }
    };
}

macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}
