use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::raw::gcd;
use crate::{Dictionary, HashTable};

impl<T, S> Serialize for HashTable<T, S>
where
    T: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self)
    }
}

impl<'de, T, S> Deserialize<'de> for HashTable<T, S>
where
    T: Deserialize<'de> + Hash + Eq,
    S: Default + BuildHasher,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SetVisitor::new())
    }
}

struct SetVisitor<T, S> {
    _marker: PhantomData<HashTable<T, S>>,
}

impl<T, S> SetVisitor<T, S> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, T, S> Visitor<'de> for SetVisitor<T, S>
where
    T: Deserialize<'de> + Hash + Eq,
    S: Default + BuildHasher,
{
    type Value = HashTable<T, S>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a set")
    }

    fn visit_seq<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: SeqAccess<'de>,
    {
        // the capacity is fixed, so buffer the elements to size the table
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element()? {
            values.push(value);
        }

        let mut table = HashTable::with_hasher(values.len(), S::default());
        for value in values {
            table.insert(value).map_err(serde::de::Error::custom)?;
        }

        Ok(table)
    }
}

impl<V> Serialize for Dictionary<V>
where
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, V> Deserialize<'de> for Dictionary<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

struct MapVisitor<V> {
    _marker: PhantomData<Dictionary<V>>,
}

impl<V> MapVisitor<V> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, V> Visitor<'de> for MapVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = Dictionary<V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }

        // the smallest capacity that every slot is reachable in with the default stride
        let step = Dictionary::<V>::STEP;
        let capacity = (entries.len()..)
            .find(|&capacity| capacity == 0 || gcd(step, capacity) == 1)
            .unwrap_or(entries.len());

        let mut dict = Dictionary::new(capacity);
        for (key, value) in entries {
            dict.insert(key, value).map_err(serde::de::Error::custom)?;
        }

        Ok(dict)
    }
}
