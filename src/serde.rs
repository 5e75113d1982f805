use serde::de::Error;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dim::{Const, Dyn};
use crate::mapping::LeftMapping;
use crate::shape::{DynRank, Shape};

#[derive(Deserialize)]
#[serde(rename = "LeftMapping")]
struct MappingFields<E, S, P> {
    extents: E,
    strides: S,
    padding: P,
}

impl<'a, const N: usize> Deserialize<'a> for Const<N> {
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let size = usize::deserialize(deserializer)?;

        if size != N {
            let msg = format!("invalid size {}, expected {}", size, N);

            return Err(D::Error::custom(msg));
        }

        Ok(Const)
    }
}

impl<'a> Deserialize<'a> for Dyn {
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Dyn(usize::deserialize(deserializer)?))
    }
}

impl<'a> Deserialize<'a> for DynRank {
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let dims = Vec::<usize>::deserialize(deserializer)?;

        Ok(DynRank::from_dims(&dims))
    }
}

impl<'a, E, S, P> Deserialize<'a> for LeftMapping<E, S, P>
where
    E: Shape + Deserialize<'a>,
    S: Shape + Deserialize<'a>,
    P: Shape + Deserialize<'a>,
{
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = MappingFields::<E, S, P>::deserialize(deserializer)?;

        LeftMapping::try_new(fields.extents, fields.strides, fields.padding)
            .map_err(D::Error::custom)
    }
}

impl<const N: usize> Serialize for Const<N> {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        N.serialize(serializer)
    }
}

impl Serialize for Dyn {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for DynRank {
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        self.dims().serialize(serializer)
    }
}

impl<E, S, P> Serialize for LeftMapping<E, S, P>
where
    E: Shape + Serialize,
    S: Shape + Serialize,
    P: Shape + Serialize,
{
    fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
        let mut state = serializer.serialize_struct("LeftMapping", 3)?;

        state.serialize_field("extents", self.extents())?;
        state.serialize_field("strides", &self.striding())?;
        state.serialize_field("padding", &self.padding())?;
        state.end()
    }
}
